// src/app/posters.rs: poster download pool + lazy texture upload
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui::{self as eg, TextureHandle};
use tracing::{debug, warn};

use crate::app::cache::{download_poster_with_client, find_cached, url_to_cache_key};
use crate::app::gfx::load_texture_from_path;
use crate::app::types::PosterState;

pub const WORKER_COUNT: usize = 6;
pub const MAX_DONE_PER_FRAME: usize = 12;
pub const MAX_UPLOADS_PER_FRAME: usize = 4;

type Job = (String, String); // (url, key)

struct PosterDone {
    url: String,
    result: Result<PathBuf, String>,
}

#[derive(Default)]
struct PosterSlot {
    key: String,
    path: Option<PathBuf>,
    tex: Option<TextureHandle>,
    state: PosterState,
}

/// Each distinct URL is fetched at most once per session.
pub struct PosterCache {
    dir: PathBuf,
    slots: HashMap<String, PosterSlot>,
    work_tx: Option<Sender<Job>>,
    done_rx: Option<Receiver<PosterDone>>,
    worker_count: usize,
    repaint: Option<eg::Context>,
}

impl PosterCache {
    pub fn new(dir: PathBuf, worker_count: usize) -> Self {
        Self {
            dir,
            slots: HashMap::new(),
            work_tx: None,
            done_rx: None,
            worker_count: worker_count.clamp(1, 32),
            repaint: None,
        }
    }

    /// Workers nudge this context when a download lands.
    pub fn set_repaint_ctx(&mut self, ctx: &eg::Context) {
        self.repaint = Some(ctx.clone());
    }

    pub fn state(&self, url: &str) -> Option<PosterState> {
        self.slots.get(url).map(|s| s.state)
    }

    /// Queue `url` unless it is already known. Disk hits skip the network.
    pub fn request(&mut self, url: &str) {
        if url.is_empty() || self.slots.contains_key(url) {
            return;
        }
        let key = url_to_cache_key(url);
        if let Some(path) = find_cached(&self.dir, &key) {
            self.slots.insert(
                url.to_string(),
                PosterSlot {
                    key,
                    path: Some(path),
                    tex: None,
                    state: PosterState::Cached,
                },
            );
            return;
        }

        let state = match self.ensure_workers() {
            Some(tx) if tx.send((url.to_string(), key.clone())).is_ok() => PosterState::Pending,
            _ => PosterState::Failed,
        };
        self.slots.insert(
            url.to_string(),
            PosterSlot {
                key,
                state,
                ..PosterSlot::default()
            },
        );
    }

    fn ensure_workers(&mut self) -> Option<&Sender<Job>> {
        if self.work_tx.is_none() {
            let client = match build_client() {
                Ok(c) => Arc::new(c),
                Err(e) => {
                    warn!("poster http client build failed: {e}");
                    return None;
                }
            };

            let (work_tx, work_rx) = mpsc::channel::<Job>();
            let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
            let work_rx = Arc::new(Mutex::new(work_rx));

            for _ in 0..self.worker_count {
                let work_rx = Arc::clone(&work_rx);
                let done_tx = done_tx.clone();
                let client = Arc::clone(&client);
                let dir = self.dir.clone();
                let repaint = self.repaint.clone();

                std::thread::spawn(move || loop {
                    let job = {
                        let Ok(rx) = work_rx.lock() else { break };
                        rx.recv()
                    };
                    let Ok((url, key)) = job else { break };

                    let result = download_poster_with_client(&client, &dir, &url, &key);
                    if done_tx.send(PosterDone { url, result }).is_err() {
                        break;
                    }
                    if let Some(ctx) = &repaint {
                        ctx.request_repaint();
                    }
                });
            }

            self.work_tx = Some(work_tx);
            self.done_rx = Some(done_rx);
        }
        self.work_tx.as_ref()
    }

    /// Drain finished downloads. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut drained = 0usize;
        while drained < MAX_DONE_PER_FRAME {
            let Some(rx) = &self.done_rx else {
                break;
            };
            let msg = match rx.try_recv() {
                Ok(msg) => msg,
                Err(mpsc::TryRecvError::Empty | mpsc::TryRecvError::Disconnected) => break,
            };
            drained += 1;

            let Some(slot) = self.slots.get_mut(&msg.url) else {
                continue;
            };
            match msg.result {
                Ok(path) => {
                    slot.path = Some(path);
                    slot.state = PosterState::Cached; // uploaded lazily during paint
                }
                Err(e) => {
                    debug!("poster download failed for {}: {e}", msg.url);
                    slot.state = PosterState::Failed;
                }
            }
        }
        drained
    }

    /// Texture for `url` if ready. Uploads a cached file when `uploads_left`
    /// allows and queues unknown URLs. (UI thread only)
    pub fn texture(
        &mut self,
        ctx: &eg::Context,
        url: &str,
        uploads_left: &mut usize,
    ) -> Option<TextureHandle> {
        self.request(url);
        let slot = self.slots.get_mut(url)?;
        match slot.state {
            PosterState::Ready => slot.tex.clone(),
            PosterState::Cached if *uploads_left > 0 => {
                let path = slot.path.clone()?;
                *uploads_left -= 1;
                match load_texture_from_path(ctx, &path, &format!("poster_{}", slot.key)) {
                    Ok(tex) => {
                        slot.tex = Some(tex.clone());
                        slot.state = PosterState::Ready;
                        Some(tex)
                    }
                    Err(e) => {
                        debug!("poster upload failed for {url}: {e}");
                        slot.state = PosterState::Failed;
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

fn build_client() -> reqwest::Result<reqwest::blocking::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("image/avif,image/webp,image/*;q=0.8,*/*;q=0.5"),
    );
    reqwest::blocking::Client::builder()
        .user_agent(concat!("cinevault/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(20))
        .pool_max_idle_per_host(8)
        .default_headers(headers)
        .build()
}
