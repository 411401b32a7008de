use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};
use std::time::{Duration, SystemTime};

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::{resolve_relative_path, AppConfig, LOCAL_CACHE_DIR};

// Chosen once per run
static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_PRUNE_ONCE: Once = Once::new();

pub const POSTER_MAX_W: u32 = 342;
pub const POSTER_QUALITY: u8 = 80;

const POSTER_RETENTION_DAYS: u64 = 14;
const POSTER_RETENTION_SECS: u64 = POSTER_RETENTION_DAYS * 24 * 60 * 60;

/// Fix the cache root from config. Later calls keep the first choice.
pub fn init_cache_dir(cfg: &AppConfig) -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let wanted = resolve_relative_path(cfg.cache_dir.as_deref().unwrap_or(LOCAL_CACHE_DIR));
            match fs::create_dir_all(&wanted) {
                Ok(()) => wanted,
                Err(e) => {
                    warn!("failed to create cache dir {}: {e}", wanted.display());
                    let fallback = resolve_relative_path(LOCAL_CACHE_DIR);
                    let _ = fs::create_dir_all(&fallback);
                    fallback
                }
            }
        })
        .clone()
}

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let path = resolve_relative_path(LOCAL_CACHE_DIR);
            let _ = fs::create_dir_all(&path);
            path
        })
        .clone()
}

pub fn poster_cache_dir() -> PathBuf {
    let dir = POSTER_DIR_ONCE.get_or_init(|| {
        let mut path = cache_dir().join("posters");
        if let Err(e) = fs::create_dir_all(&path) {
            warn!("failed to create poster cache dir {}: {e}", path.display());
            path = cache_dir();
        }
        path
    });

    POSTER_PRUNE_ONCE.call_once({
        let path = dir.clone();
        move || match prune_poster_cache_in_dir(&path) {
            Ok(0) => {}
            Ok(n) => debug!("pruned {n} stale posters"),
            Err(err) => warn!("poster cache prune failed: {err}"),
        }
    });

    dir.clone()
}

fn prune_poster_cache_in_dir(dir: &Path) -> std::io::Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(POSTER_RETENTION_SECS))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase());
        match ext.as_deref() {
            // leftovers from an interrupted write
            Some("part") => {
                let _ = fs::remove_file(&path);
                removed += 1;
                continue;
            }
            Some("jpg" | "png") => {}
            _ => continue,
        }
        let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if modified < cutoff {
            let _ = fs::remove_file(&path);
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn poster_path_for_key(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.jpg"))
}

pub fn find_cached(dir: &Path, key: &str) -> Option<PathBuf> {
    let p = poster_path_for_key(dir, key);
    p.exists().then_some(p)
}

/// Return (width, height, RGBA8 bytes) for a cached poster file.
pub fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>), String> {
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().into_raw()))
}

/// Download a poster with the shared client and store it resized.
pub fn download_poster_with_client(
    client: &Client,
    dir: &Path,
    url: &str,
    key: &str,
) -> Result<PathBuf, String> {
    if let Some(hit) = find_cached(dir, key) {
        return Ok(hit);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download bytes: {e}"))?;

    store_resized(dir, &bytes, key, POSTER_MAX_W, POSTER_QUALITY)
}

/// Decode, shrink to `max_width` (aspect kept) and write `<dir>/<key>.jpg`.
pub fn store_resized(
    dir: &Path,
    bytes: &[u8],
    key: &str,
    max_width: u32,
    quality: u8,
) -> Result<PathBuf, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("decode: {e}"))?;

    let (w, h) = img.dimensions();
    let out: DynamicImage = if w > max_width {
        let new_h = ((h as f32) * (max_width as f32 / w as f32))
            .round()
            .max(1.0) as u32;
        img.resize_exact(max_width, new_h, FilterType::CatmullRom)
    } else {
        img
    };
    // JPEG has no alpha channel
    let rgb = out.to_rgb8();

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, quality)
        .encode_image(&rgb)
        .map_err(|e| format!("jpeg encode: {e}"))?;

    fs::create_dir_all(dir).map_err(|e| format!("create {}: {e}", dir.display()))?;
    let dest = poster_path_for_key(dir, key);
    let tmp = dest.with_extension("jpg.part");
    {
        let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
        f.write_all(&jpeg_bytes).map_err(|e| format!("write: {e}"))?;
    }
    fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;
    Ok(dest)
}
