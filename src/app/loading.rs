// src/app/loading.rs: background fetch cycles (genres, discover+upcoming, search)
use std::sync::mpsc;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::mapping::map_movies;
use crate::app::types::LoadMsg;
use crate::tmdb::{Catalog, SortBy};

pub const LOAD_ERROR_MSG: &str = "Unable to load TMDB data. Check your API key and try again.";
pub const SEARCH_ERROR_MSG: &str = "Search failed. Try again.";

const MAX_MSGS_PER_FRAME: usize = 8;

impl crate::app::CineVaultApp {
    /// Genres are fetched once; a failure leaves the list empty.
    pub(crate) fn start_genre_fetch(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.load_tx.clone();
        let repaint = self.repaint.clone();
        std::thread::spawn(move || {
            let _ = tx.send(LoadMsg::Genres(catalog.fetch_genres()));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Bump the generation and fetch discover + upcoming together. Anything
    /// still in flight from an older cycle is ignored when it lands.
    pub(crate) fn start_load_cycle(&mut self) {
        self.generation += 1;
        self.loading = true;
        self.error = None;

        let generation = self.generation;
        let search_seq = self.search_seq;
        let sort_by = self.sort_by;
        let genre_id = self.selected_genre;
        let catalog = Arc::clone(&self.catalog);
        let tx = self.load_tx.clone();
        let repaint = self.repaint.clone();
        debug!("load cycle {generation}: sort={} genre={genre_id:?}", sort_by.as_str());

        std::thread::spawn(move || {
            let result = fetch_cycle(catalog.as_ref(), sort_by, genre_id);
            let _ = tx.send(LoadMsg::Cycle {
                generation,
                search_seq,
                result,
            });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Blank queries do nothing. Results replace the recommended cards.
    pub(crate) fn run_search(&mut self) {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.search_seq += 1;
        self.loading = true;
        self.error = None;

        let generation = self.generation;
        let seq = self.search_seq;
        let sort_by = self.sort_by;
        let genre_id = self.selected_genre;
        let catalog = Arc::clone(&self.catalog);
        let tx = self.load_tx.clone();
        let repaint = self.repaint.clone();
        info!("search #{seq}: {query:?}");

        std::thread::spawn(move || {
            let result = catalog.search_movies(&query, sort_by, genre_id);
            let _ = tx.send(LoadMsg::Search {
                generation,
                seq,
                result,
            });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    pub(crate) fn set_sort(&mut self, sort_by: SortBy) {
        if self.sort_by != sort_by {
            self.sort_by = sort_by;
            self.start_load_cycle();
        }
    }

    pub(crate) fn set_genre(&mut self, genre_id: Option<i64>) {
        if self.selected_genre != genre_id {
            self.selected_genre = genre_id;
            self.start_load_cycle();
        }
    }

    /// Apply finished background work. (UI thread)
    pub(crate) fn poll_loads(&mut self) {
        for _ in 0..MAX_MSGS_PER_FRAME {
            let msg = match self.load_rx.try_recv() {
                Ok(m) => m,
                Err(mpsc::TryRecvError::Empty | mpsc::TryRecvError::Disconnected) => break,
            };
            match msg {
                LoadMsg::Genres(Ok(genres)) => {
                    info!("loaded {} genres", genres.len());
                    self.genres = genres;
                    self.start_load_cycle();
                }
                LoadMsg::Genres(Err(e)) => warn!("genre fetch failed: {e}"),

                LoadMsg::Cycle { generation, .. } if generation != self.generation => {
                    debug!("dropping stale cycle {generation}");
                }
                // A search issued after this cycle owns the cards and the spinner.
                LoadMsg::Cycle {
                    search_seq, result, ..
                } if search_seq != self.search_seq => match result {
                    Ok((_, upcoming)) => {
                        debug!("cycle landed after search #{}; keeping its cards", self.search_seq);
                        self.upcoming = map_movies(&upcoming, &self.genres, true);
                    }
                    Err(e) => warn!("load cycle failed behind a search: {e}"),
                },
                LoadMsg::Cycle { result, .. } => {
                    match result {
                        Ok((discover, upcoming)) => {
                            self.recommended = map_movies(&discover, &self.genres, false);
                            self.upcoming = map_movies(&upcoming, &self.genres, true);
                        }
                        Err(e) => {
                            warn!("load cycle failed: {e}");
                            self.error = Some(LOAD_ERROR_MSG.to_string());
                        }
                    }
                    self.loading = false;
                }

                LoadMsg::Search { generation, seq, .. }
                    if generation != self.generation || seq != self.search_seq =>
                {
                    debug!("dropping stale search #{seq}");
                }
                LoadMsg::Search { result, .. } => {
                    match result {
                        Ok(found) => self.recommended = map_movies(&found, &self.genres, false),
                        Err(e) => {
                            warn!("search failed: {e}");
                            self.error = Some(SEARCH_ERROR_MSG.to_string());
                        }
                    }
                    self.loading = false;
                }
            }
        }
    }
}

type CycleResult = crate::tmdb::Result<(Vec<crate::tmdb::TmdbMovie>, Vec<crate::tmdb::TmdbMovie>)>;

/// Both requests run in parallel; the first error wins.
fn fetch_cycle(catalog: &dyn Catalog, sort_by: SortBy, genre_id: Option<i64>) -> CycleResult {
    std::thread::scope(|s| {
        let upcoming = s.spawn(|| catalog.fetch_upcoming());
        let discover = catalog.discover_movies(sort_by, genre_id);
        let upcoming = upcoming.join().unwrap_or_else(|_| {
            Err(crate::tmdb::TmdbError::Decode("upcoming fetch panicked".into()))
        });
        Ok((discover?, upcoming?))
    })
}
