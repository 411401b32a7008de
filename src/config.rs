use std::{env, fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const LOCAL_DATA_DIR: &str = ".cinevault";
pub const LOCAL_CACHE_DIR: &str = ".cinevault_cache";
pub const LOCAL_STORE_FILE: &str = "cinevault.db";

/// Env vars checked for the provider key, in priority order.
const API_KEY_VARS: [&str; 2] = ["TMDB_API_KEY", "VITE_TMDB_API_KEY"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub cache_dir: Option<String>,
    pub data_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE.to_string(),
            cache_dir: None,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// The key as sent to the provider; empty when not configured.
    pub fn api_key_or_empty(&self) -> String {
        self.tmdb_api_key.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(alias = "api_key")]
    tmdb_api_key: Option<String>,
    tmdb_base_url: Option<String>,
    cache_dir: Option<String>,
    data_dir: Option<String>,
}

/// Layer `config.json`, then `.env` and process env. Never fails: a missing
/// API key is only a warning and requests will be rejected by the provider.
pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from("config.json");
    let mut cfg = AppConfig::default();

    match fs::read_to_string(&cfg_path) {
        Ok(raw) => match parse_config(&raw) {
            Ok(parsed) => {
                apply_raw(&mut cfg, parsed);
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
        }
    }

    let _ = dotenvy::dotenv();
    if let Some(key) = api_key_from_env() {
        cfg.tmdb_api_key = Some(key);
    }

    if cfg.tmdb_api_key.is_none() {
        warn!("Missing TMDB_API_KEY. Add it to .env or config.json and restart.");
    }

    cfg
}

fn parse_config(raw: &str) -> Result<RawConfig, serde_json::Error> {
    serde_json::from_str::<RawConfig>(raw)
}

fn apply_raw(cfg: &mut AppConfig, parsed: RawConfig) {
    if let Some(key) = non_blank(parsed.tmdb_api_key) {
        cfg.tmdb_api_key = Some(key);
    }
    if let Some(base) = non_blank(parsed.tmdb_base_url) {
        cfg.tmdb_base_url = base.trim_end_matches('/').to_string();
    }
    if parsed.cache_dir.is_some() {
        cfg.cache_dir = parsed.cache_dir;
    }
    if parsed.data_dir.is_some() {
        cfg.data_dir = parsed.data_dir;
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .find_map(|name| non_blank(env::var(name).ok()))
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Relative paths are resolved against the working directory.
pub fn resolve_relative_path(p: &str) -> PathBuf {
    let path = PathBuf::from(p);
    if path.is_absolute() {
        return path;
    }
    env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

pub fn data_dir(cfg: &AppConfig) -> PathBuf {
    resolve_relative_path(cfg.data_dir.as_deref().unwrap_or(LOCAL_DATA_DIR))
}

pub fn store_path(cfg: &AppConfig) -> PathBuf {
    data_dir(cfg).join(LOCAL_STORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let raw = r#"{ "tmdb_api_key": " abc ", "tmdb_base_url": "http://localhost:9/3/", "data_dir": "d" }"#;
        let mut cfg = AppConfig::default();
        apply_raw(&mut cfg, parse_config(raw).unwrap());
        assert_eq!(cfg.tmdb_api_key.as_deref(), Some("abc"));
        assert_eq!(cfg.tmdb_base_url, "http://localhost:9/3");
        assert_eq!(cfg.data_dir.as_deref(), Some("d"));
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = AppConfig::default();
        apply_raw(&mut cfg, parse_config(r#"{ "api_key": "  " }"#).unwrap());
        assert!(cfg.tmdb_api_key.is_none());
        assert_eq!(cfg.api_key_or_empty(), "");
        assert_eq!(cfg.tmdb_base_url, DEFAULT_TMDB_BASE);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config(r#"{ "plex_db_source": "x" }"#).is_err());
    }

    #[test]
    fn store_lives_under_data_dir() {
        let cfg = AppConfig {
            data_dir: Some("/tmp/cv".into()),
            ..AppConfig::default()
        };
        assert_eq!(store_path(&cfg), PathBuf::from("/tmp/cv/cinevault.db"));
    }
}
