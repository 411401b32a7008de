use crate::app::types::{MovieRef, PlanItem, WatchedItem};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LibraryFilter {
    #[default]
    All,
    Plan,
    Watched,
}

impl LibraryFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Plan, Self::Watched];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Plan => "Plan",
            Self::Watched => "Watched",
        }
    }

    fn admits(self, status: LibraryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Plan => status == LibraryStatus::Plan,
            Self::Watched => status == LibraryStatus::Watched,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryStatus {
    Watched,
    Plan,
}

/// One row of the unified library view.
#[derive(Clone, Debug, PartialEq)]
pub struct LibraryItem {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub genres: Vec<String>,
    pub year: Option<String>,
    pub status: LibraryStatus,
    /// Watched date or added date.
    pub date: String,
    pub user_rating: Option<f64>,
    pub notes: Option<String>,
    pub overview: Option<String>,
}

impl LibraryItem {
    fn haystack(&self) -> String {
        format!("{} {}", self.title, self.genres.join(" ")).to_lowercase()
    }
}

impl From<&LibraryItem> for MovieRef {
    fn from(item: &LibraryItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            poster: item.poster.clone(),
            genres: item.genres.clone(),
            year: item.year.clone(),
            overview: item.overview.clone(),
        }
    }
}

/// Watched + plan, filtered by status and text, newest first.
pub fn filtered_library(
    watched: &[WatchedItem],
    plan: &[PlanItem],
    filter: LibraryFilter,
    query: &str,
) -> Vec<LibraryItem> {
    let watched_rows = watched.iter().map(|w| LibraryItem {
        id: w.id,
        title: w.title.clone(),
        poster: w.poster.clone(),
        genres: w.genres.clone(),
        year: w.year.clone(),
        status: LibraryStatus::Watched,
        date: w.date_watched.clone(),
        user_rating: Some(w.user_rating),
        notes: w.notes.clone(),
        overview: w.overview.clone(),
    });
    let plan_rows = plan.iter().map(|p| LibraryItem {
        id: p.id,
        title: p.title.clone(),
        poster: p.poster.clone(),
        genres: p.genres.clone(),
        year: p.year.clone(),
        status: LibraryStatus::Plan,
        date: p.added_date.clone(),
        user_rating: None,
        notes: None,
        overview: p.overview.clone(),
    });

    let needle = query.trim().to_lowercase();
    let mut out: Vec<LibraryItem> = watched_rows
        .chain(plan_rows)
        .filter(|item| filter.admits(item.status))
        .filter(|item| needle.is_empty() || item.haystack().contains(&needle))
        .collect();

    // ISO 8601 timestamps are fixed width, so string order is time order.
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(id: i64, title: &str, genres: &[&str], date: &str) -> WatchedItem {
        WatchedItem {
            id,
            title: title.into(),
            poster: String::new(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            user_rating: 4.0,
            notes: Some("n".into()),
            date_watched: date.into(),
            year: None,
            overview: None,
        }
    }

    fn p(id: i64, title: &str, genres: &[&str], date: &str) -> PlanItem {
        PlanItem {
            id,
            title: title.into(),
            poster: String::new(),
            genres: genres.iter().map(|s| s.to_string()).collect(),
            added_date: date.into(),
            year: None,
            overview: None,
        }
    }

    fn sample() -> (Vec<WatchedItem>, Vec<PlanItem>) {
        (
            vec![
                w(1, "Heat", &["Crime", "Drama"], "2025-01-03T10:00:00.000Z"),
                w(2, "Alien", &["Horror"], "2024-12-01T10:00:00.000Z"),
            ],
            vec![
                p(3, "Arrival", &["Science Fiction"], "2025-02-01T10:00:00.000Z"),
                p(4, "Paddington", &["Family"], "2024-11-20T10:00:00.000Z"),
            ],
        )
    }

    fn ids(items: &[LibraryItem]) -> Vec<i64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn all_items_newest_first() {
        let (wl, pl) = sample();
        let out = filtered_library(&wl, &pl, LibraryFilter::All, "");
        assert_eq!(ids(&out), [3, 1, 2, 4]);
        assert_eq!(out[1].user_rating, Some(4.0));
        assert_eq!(out[0].user_rating, None);
    }

    #[test]
    fn status_filter() {
        let (wl, pl) = sample();
        assert_eq!(ids(&filtered_library(&wl, &pl, LibraryFilter::Plan, "")), [3, 4]);
        assert_eq!(ids(&filtered_library(&wl, &pl, LibraryFilter::Watched, "")), [1, 2]);
    }

    #[test]
    fn text_matches_title_or_genre_case_insensitively() {
        let (wl, pl) = sample();
        assert_eq!(ids(&filtered_library(&wl, &pl, LibraryFilter::All, "  DRAMA ")), [1]);
        assert_eq!(ids(&filtered_library(&wl, &pl, LibraryFilter::All, "ali")), [2]);
        assert_eq!(ids(&filtered_library(&wl, &pl, LibraryFilter::All, "fiction")), [3]);
        assert!(filtered_library(&wl, &pl, LibraryFilter::Watched, "family").is_empty());
    }

    #[test]
    fn text_can_span_title_and_genre() {
        let (wl, pl) = sample();
        assert_eq!(ids(&filtered_library(&wl, &pl, LibraryFilter::All, "heat crime")), [1]);
    }
}
