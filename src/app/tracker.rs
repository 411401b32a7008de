// src/app/tracker.rs: the two tracked lists and every mutation on them
use chrono::{SecondsFormat, Utc};

use crate::app::storage::{Store, KEY_PLAN, KEY_WATCHED};
use crate::app::types::{LogDraft, LogMode, MovieCard, MovieRef, PlanItem, WatchStatus, WatchedItem};

pub const DEFAULT_LOG_RATING: f64 = 4.0;

/// ISO 8601 UTC with milliseconds; fixed width, so string order is time order.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Watched entries newest first, plan entries newest first. An id lives in at
/// most one of the two lists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tracker {
    watched: Vec<WatchedItem>,
    plan: Vec<PlanItem>,
}

impl Tracker {
    pub fn new(watched: Vec<WatchedItem>, plan: Vec<PlanItem>) -> Self {
        Self { watched, plan }
    }

    /// Saved lists win, even when empty. A missing or unreadable list falls
    /// back to its seed, minus any id the other list already holds.
    pub fn load(store: &Store) -> Self {
        let now = now_iso();
        let saved_watched: Option<Vec<WatchedItem>> = store.read_list_opt(KEY_WATCHED);
        let saved_plan: Option<Vec<PlanItem>> = store.read_list_opt(KEY_PLAN);

        match (saved_watched, saved_plan) {
            (Some(watched), Some(plan)) => Self { watched, plan },
            (Some(watched), None) => {
                let mut plan = plan_seed(&now);
                plan.retain(|p| watched.iter().all(|w| w.id != p.id));
                Self { watched, plan }
            }
            (None, Some(plan)) => {
                let mut watched = watched_seed(&now);
                watched.retain(|w| plan.iter().all(|p| p.id != w.id));
                Self { watched, plan }
            }
            (None, None) => Self {
                watched: watched_seed(&now),
                plan: plan_seed(&now),
            },
        }
    }

    pub fn save_watched(&self, store: &Store) {
        store.write_list(KEY_WATCHED, &self.watched);
    }

    pub fn save_plan(&self, store: &Store) {
        store.write_list(KEY_PLAN, &self.plan);
    }

    pub fn watched(&self) -> &[WatchedItem] {
        &self.watched
    }

    pub fn plan(&self) -> &[PlanItem] {
        &self.plan
    }

    pub fn find_watched(&self, id: i64) -> Option<&WatchedItem> {
        self.watched.iter().find(|w| w.id == id)
    }

    pub fn status_of(&self, id: i64) -> WatchStatus {
        if self.watched.iter().any(|w| w.id == id) {
            WatchStatus::Watched
        } else if self.plan.iter().any(|p| p.id == id) {
            WatchStatus::Planned
        } else {
            WatchStatus::Untracked
        }
    }

    /// Returns false (and changes nothing) when the id is already tracked.
    pub fn add_to_plan(&mut self, card: &MovieCard, now: &str) -> bool {
        if self.status_of(card.id) != WatchStatus::Untracked {
            return false;
        }
        self.plan.insert(
            0,
            PlanItem {
                id: card.id,
                title: card.title.clone(),
                poster: card.poster.clone(),
                genres: card.genres.clone(),
                added_date: now.to_string(),
                year: Some(card.year.clone()),
                overview: card.overview.clone(),
            },
        );
        true
    }

    /// Upsert into watched (moved to front) and drop any plan entry with the
    /// same id, in one step.
    pub fn log_watched(&mut self, movie: &MovieRef, rating: f64, notes: &str, now: &str) {
        let notes = notes.trim();
        let entry = WatchedItem {
            id: movie.id,
            title: movie.title.clone(),
            poster: movie.poster.clone(),
            genres: movie.genres.clone(),
            user_rating: rating,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            date_watched: now.to_string(),
            year: movie.year.clone(),
            overview: movie.overview.clone(),
        };
        self.watched.retain(|w| w.id != entry.id);
        self.watched.insert(0, entry);
        self.plan.retain(|p| p.id != movie.id);
    }

    /// Edit pre-fills from the existing entry; add always starts fresh.
    pub fn open_draft(&self, movie: MovieRef, mode: LogMode) -> LogDraft {
        let (rating, notes) = match mode {
            LogMode::Edit => self
                .find_watched(movie.id)
                .map(|w| (w.user_rating, w.notes.clone().unwrap_or_default()))
                .unwrap_or((DEFAULT_LOG_RATING, String::new())),
            LogMode::Add => (DEFAULT_LOG_RATING, String::new()),
        };
        LogDraft {
            movie,
            mode,
            rating,
            notes,
        }
    }

    pub fn commit_draft(&mut self, draft: &LogDraft, now: &str) {
        self.log_watched(&draft.movie, draft.rating, &draft.notes, now);
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.watched.is_empty() {
            return None;
        }
        let sum: f64 = self.watched.iter().map(|w| w.user_rating).sum();
        Some(sum / self.watched.len() as f64)
    }
}

const SEED_POSTER_A: &str =
    "https://images.unsplash.com/photo-1485846234645-a62644f84728?q=80&w=400&auto=format&fit=crop";
const SEED_POSTER_B: &str =
    "https://images.unsplash.com/photo-1489599849927-2ee91cede3ba?q=80&w=400&auto=format&fit=crop";
const SEED_POSTER_C: &str =
    "https://images.unsplash.com/photo-1502134249126-9f3755a50d78?q=80&w=400&auto=format&fit=crop";

pub fn watched_seed(now: &str) -> Vec<WatchedItem> {
    vec![
        WatchedItem {
            id: 21,
            title: "Quiet Voltage".into(),
            poster: SEED_POSTER_A.into(),
            genres: vec!["Indie".into(), "Drama".into()],
            user_rating: 4.5,
            notes: None,
            date_watched: now.to_string(),
            year: Some("2020".into()),
            overview: None,
        },
        WatchedItem {
            id: 22,
            title: "Neon Hymn".into(),
            poster: SEED_POSTER_B.into(),
            genres: vec!["Music".into(), "Biography".into()],
            user_rating: 4.0,
            notes: None,
            date_watched: now.to_string(),
            year: Some("2019".into()),
            overview: None,
        },
    ]
}

pub fn plan_seed(now: &str) -> Vec<PlanItem> {
    vec![PlanItem {
        id: 31,
        title: "Tideline Echo".into(),
        poster: SEED_POSTER_C.into(),
        genres: vec!["Drama".into()],
        added_date: now.to_string(),
        year: Some("2024".into()),
        overview: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: &str = "2025-01-01T00:00:00.000Z";
    const T1: &str = "2025-02-01T00:00:00.000Z";

    fn card(id: i64) -> MovieCard {
        MovieCard {
            id,
            title: format!("Card {id}"),
            year: "2023".into(),
            rating: 3.5,
            genres: vec!["Drama".into()],
            runtime: "2023".into(),
            poster: format!("https://img/{id}.jpg"),
            overview: Some("plot".into()),
        }
    }

    fn empty() -> Tracker {
        Tracker::new(Vec::new(), Vec::new())
    }

    #[test]
    fn plan_add_is_idempotent() {
        let mut t = empty();
        assert!(t.add_to_plan(&card(5), T0));
        let after_first = t.clone();
        assert!(!t.add_to_plan(&card(5), T1));
        assert_eq!(t, after_first);
        assert_eq!(t.plan().len(), 1);
        assert_eq!(t.plan()[0].added_date, T0);
    }

    #[test]
    fn plan_add_skips_watched_ids() {
        let mut t = empty();
        t.log_watched(&MovieRef::from(&card(8)), 3.0, "", T0);
        assert!(!t.add_to_plan(&card(8), T1));
        assert!(t.plan().is_empty());
    }

    #[test]
    fn new_plan_entries_go_first() {
        let mut t = empty();
        t.add_to_plan(&card(1), T0);
        t.add_to_plan(&card(2), T1);
        let ids: Vec<_> = t.plan().iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn marking_planned_items_watched_moves_them() {
        let mut t = empty();
        for id in 1..=4 {
            t.add_to_plan(&card(id), T0);
        }
        let planned: Vec<MovieRef> = t
            .plan()
            .iter()
            .map(|p| MovieRef {
                id: p.id,
                title: p.title.clone(),
                poster: p.poster.clone(),
                genres: p.genres.clone(),
                year: p.year.clone(),
                overview: p.overview.clone(),
            })
            .collect();
        for movie in &planned {
            let draft = t.open_draft(movie.clone(), LogMode::Add);
            t.commit_draft(&draft, T1);
            assert_eq!(t.status_of(movie.id), WatchStatus::Watched);
            assert!(t.plan().iter().all(|p| p.id != movie.id));
        }
        assert!(t.plan().is_empty());
        assert_eq!(t.watched().len(), 4);
    }

    #[test]
    fn new_watched_entry_goes_to_front_and_leaves_plan() {
        let mut t = Tracker::new(watched_seed(T0), plan_seed(T0));
        let plan_before = t.plan().to_vec();

        t.log_watched(&MovieRef::from(&card(99)), 5.0, "great", T1);

        let first = &t.watched()[0];
        assert_eq!(first.id, 99);
        assert_eq!(first.user_rating, 5.0);
        assert_eq!(first.notes.as_deref(), Some("great"));
        assert_eq!(first.date_watched, T1);
        assert_eq!(t.watched().len(), 3);
        assert_eq!(t.plan(), plan_before.as_slice());
    }

    #[test]
    fn relogging_replaces_and_moves_to_front() {
        let mut t = Tracker::new(watched_seed(T0), Vec::new());
        let neon = MovieRef {
            id: 22,
            title: "Neon Hymn".into(),
            poster: String::new(),
            genres: vec![],
            year: None,
            overview: None,
        };
        t.log_watched(&neon, 2.0, "   ", T1);
        assert_eq!(t.watched().len(), 2);
        assert_eq!(t.watched()[0].id, 22);
        assert_eq!(t.watched()[0].user_rating, 2.0);
        assert_eq!(t.watched()[0].notes, None);
        assert_eq!(t.watched()[1].id, 21);
    }

    #[test]
    fn drafts_prefill_only_in_edit_mode() {
        let mut t = empty();
        t.log_watched(&MovieRef::from(&card(3)), 2.0, " meh ", T0);
        let movie = MovieRef::from(&card(3));

        let edit = t.open_draft(movie.clone(), LogMode::Edit);
        assert_eq!((edit.rating, edit.notes.as_str()), (2.0, "meh"));

        let add = t.open_draft(movie, LogMode::Add);
        assert_eq!((add.rating, add.notes.as_str()), (DEFAULT_LOG_RATING, ""));

        let fresh = t.open_draft(MovieRef::from(&card(4)), LogMode::Edit);
        assert_eq!((fresh.rating, fresh.notes.as_str()), (DEFAULT_LOG_RATING, ""));
    }

    #[test]
    fn average_rating_over_watched() {
        assert_eq!(empty().average_rating(), None);
        let t = Tracker::new(watched_seed(T0), Vec::new());
        assert_eq!(t.average_rating(), Some(4.25));
    }

    #[test]
    fn load_seeds_when_nothing_saved() {
        let store = Store::in_memory();
        let t = Tracker::load(&store);
        let ids: Vec<_> = t.watched().iter().map(|w| w.id).collect();
        assert_eq!(ids, [21, 22]);
        assert_eq!(t.plan()[0].id, 31);
    }

    #[test]
    fn corrupt_watched_key_falls_back_to_seed() {
        let store = Store::in_memory();
        store.write_value(KEY_WATCHED, "[{oops");
        let t = Tracker::load(&store);
        assert_eq!(t.watched().len(), 2);
        assert_eq!(t.watched()[0].title, "Quiet Voltage");
    }

    #[test]
    fn emptied_plan_stays_empty_after_reload() {
        let store = Store::in_memory();
        let mut t = Tracker::load(&store);
        let tideline = MovieRef {
            id: 31,
            title: "Tideline Echo".into(),
            poster: String::new(),
            genres: vec!["Drama".into()],
            year: Some("2024".into()),
            overview: None,
        };
        t.log_watched(&tideline, 4.0, "", T1);
        t.save_watched(&store);
        t.save_plan(&store);
        assert_eq!(store.read_value(KEY_PLAN).as_deref(), Some("[]"));

        let back = Tracker::load(&store);
        assert_eq!(back.status_of(31), WatchStatus::Watched);
        assert!(back.plan().is_empty());
        assert_eq!(back.watched().iter().filter(|w| w.id == 31).count(), 1);
    }

    #[test]
    fn seed_skips_ids_held_by_the_other_list() {
        let store = Store::in_memory();
        let mut t = empty();
        t.log_watched(
            &MovieRef {
                id: 31,
                title: "Tideline Echo".into(),
                poster: String::new(),
                genres: vec![],
                year: None,
                overview: None,
            },
            3.0,
            "",
            T0,
        );
        t.save_watched(&store);
        store.write_value(KEY_PLAN, "{broken");

        let back = Tracker::load(&store);
        assert!(back.plan().iter().all(|p| p.id != 31));
        assert_eq!(back.status_of(31), WatchStatus::Watched);
    }

    #[test]
    fn saved_lists_win_over_seed() {
        let store = Store::in_memory();
        let mut t = empty();
        t.add_to_plan(&card(40), T0);
        t.log_watched(&MovieRef::from(&card(41)), 4.0, "", T0);
        t.save_watched(&store);
        t.save_plan(&store);

        let back = Tracker::load(&store);
        assert_eq!(back, t);
    }

    #[test]
    fn timestamps_are_fixed_width_utc() {
        let ts = now_iso();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
    }
}
