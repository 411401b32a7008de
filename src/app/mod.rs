// src/app/mod.rs: CineVault shell; owns all UI state and drains background work each frame

// ---- Standard lib imports ----
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

// ---- Crates ----
use eframe::egui as eg;
use tracing::{info, warn};

// ---- Local modules ----
pub mod cache;
pub mod gfx;
pub mod library;
pub mod loading;
pub mod mapping;
pub mod posters;
pub mod prefs;
pub mod storage;
pub mod tracker;
pub mod types;
pub mod ui;

use crate::app::library::{filtered_library, LibraryFilter, LibraryItem};
use crate::app::posters::{PosterCache, WORKER_COUNT};
use crate::app::storage::Store;
use crate::app::tracker::{now_iso, Tracker};
use crate::app::types::{
    ActiveDetails, LoadMsg, LogDraft, LogMode, MovieCard, MovieRef, Theme, WatchStatus,
};
use crate::config::{store_path, AppConfig};
use crate::tmdb::{Catalog, SortBy, TmdbClient, TmdbGenre};

/// Shown for averages when nothing has been rated.
pub const NO_VALUE: &str = " - ";
pub const EMPTY_PLAN_HINT: &str = "Add a film";

/// Header numbers derived from the two lists.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub watched_count: usize,
    pub last_watched: Option<String>,
    pub average_rating: String,
    pub next_plan: String,
    pub plan_count: usize,
}

pub struct CineVaultApp {
    catalog: Arc<dyn Catalog>,
    store: Store,
    tracker: Tracker,

    // discovery
    query: String,
    selected_genre: Option<i64>,
    sort_by: SortBy,
    genres: Vec<TmdbGenre>,
    recommended: Vec<MovieCard>,
    upcoming: Vec<MovieCard>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    search_seq: u64,
    load_tx: Sender<LoadMsg>,
    load_rx: Receiver<LoadMsg>,

    // dialogs
    active_log: Option<LogDraft>,
    active_details: Option<ActiveDetails>,

    // library
    library_filter: LibraryFilter,
    library_query: String,
    scroll_to_library: bool,

    // look & feel
    theme: Theme,
    theme_applied: Option<Theme>,
    posters: PosterCache,

    repaint: Option<eg::Context>,
    did_init: bool,
}

impl CineVaultApp {
    pub fn new(cfg: &AppConfig) -> Self {
        let catalog: Arc<dyn Catalog> = match TmdbClient::from_config(cfg) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                // Only a TLS backend failure gets here; keep the UI usable.
                warn!("TMDB client setup failed ({e}); retrying with defaults");
                Arc::new(TmdbClient::with_client(
                    reqwest::blocking::Client::new(),
                    &cfg.tmdb_base_url,
                    &cfg.api_key_or_empty(),
                ))
            }
        };
        let store = Store::open(&store_path(cfg));
        let poster_dir = {
            cache::init_cache_dir(cfg);
            cache::poster_cache_dir()
        };
        info!("Poster cache at {}", poster_dir.display());
        Self::with_parts(catalog, store, poster_dir)
    }

    /// Wire an app from explicit parts; nothing is fetched until the first frame.
    pub fn with_parts(catalog: Arc<dyn Catalog>, store: Store, poster_dir: PathBuf) -> Self {
        let tracker = Tracker::load(&store);
        let (load_tx, load_rx) = mpsc::channel();
        let mut app = Self {
            catalog,
            store,
            tracker,
            query: String::new(),
            selected_genre: None,
            sort_by: SortBy::default(),
            genres: Vec::new(),
            recommended: Vec::new(),
            upcoming: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
            search_seq: 0,
            load_tx,
            load_rx,
            active_log: None,
            active_details: None,
            library_filter: LibraryFilter::All,
            library_query: String::new(),
            scroll_to_library: false,
            theme: Theme::default(),
            theme_applied: None,
            posters: PosterCache::new(poster_dir, WORKER_COUNT),
            repaint: None,
            did_init: false,
        };
        app.load_prefs();
        app
    }

    // ---- tracked lists ----

    pub(crate) fn add_to_plan(&mut self, card: &MovieCard) {
        if self.tracker.add_to_plan(card, &now_iso()) {
            info!("planned {} ({})", card.title, card.id);
            self.tracker.save_plan(&self.store);
        }
    }

    pub(crate) fn open_log(&mut self, movie: MovieRef, mode: LogMode) {
        self.active_log = Some(self.tracker.open_draft(movie, mode));
    }

    /// Commit the open draft, close the dialog and persist both lists.
    pub(crate) fn save_log(&mut self) {
        let Some(draft) = self.active_log.take() else {
            return;
        };
        self.tracker.commit_draft(&draft, &now_iso());
        info!("logged {} ({}) at {}", draft.movie.title, draft.movie.id, draft.rating);
        self.tracker.save_watched(&self.store);
        self.tracker.save_plan(&self.store);
    }

    pub(crate) fn cancel_log(&mut self) {
        self.active_log = None;
    }

    /// Titles without a synopsis have nothing to show.
    pub(crate) fn open_details(&mut self, movie: &MovieRef) {
        let Some(overview) = movie.overview.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            return;
        };
        self.active_details = Some(ActiveDetails {
            id: movie.id,
            title: movie.title.clone(),
            overview: overview.to_string(),
            poster: (!movie.poster.is_empty()).then(|| movie.poster.clone()),
            year: movie.year.clone(),
            genres: movie.genres.clone(),
        });
    }

    pub(crate) fn close_details(&mut self) {
        self.active_details = None;
    }

    pub(crate) fn status_of(&self, id: i64) -> WatchStatus {
        self.tracker.status_of(id)
    }

    pub(crate) fn stats(&self) -> Stats {
        let watched = self.tracker.watched();
        let plan = self.tracker.plan();
        Stats {
            watched_count: watched.len(),
            last_watched: watched.first().map(|w| w.title.clone()),
            average_rating: self
                .tracker
                .average_rating()
                .map_or_else(
                    || NO_VALUE.to_string(),
                    |avg| format!("{:.1}", (avg * 10.0).round() / 10.0),
                ),
            next_plan: plan
                .first()
                .map_or_else(|| EMPTY_PLAN_HINT.to_string(), |p| p.title.clone()),
            plan_count: plan.len(),
        }
    }

    pub(crate) fn library_items(&self) -> Vec<LibraryItem> {
        filtered_library(
            self.tracker.watched(),
            self.tracker.plan(),
            self.library_filter,
            &self.library_query,
        )
    }

    /// Top-bar shortcut: filter the library and bring it into view.
    pub(crate) fn jump_to_library(&mut self, filter: LibraryFilter) {
        self.library_filter = filter;
        self.scroll_to_library = true;
    }
}

impl eframe::App for CineVaultApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        // First frame
        if !self.did_init {
            self.did_init = true;
            self.repaint = Some(ctx.clone());
            self.posters.set_repaint_ctx(ctx);
            self.start_genre_fetch();
            self.start_load_cycle();
        }

        self.apply_theme(ctx);
        self.poll_loads();
        self.posters.poll();

        self.ui_render_topbar(ctx);
        self.ui_render_ratings_panel(ctx);
        eg::CentralPanel::default().show(ctx, |ui| self.ui_render_dashboard(ui, ctx));
        self.ui_render_log_dialog(ctx);
        self.ui_render_details_dialog(ctx);
    }
}
