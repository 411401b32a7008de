// src/app/storage.rs: best-effort key/value persistence (SQLite file, JSON values)
use std::fs;
use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

pub const KEY_WATCHED: &str = "watched";
pub const KEY_PLAN: &str = "planToWatch";
pub const KEY_THEME: &str = "theme";

const SQL_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
  key   TEXT PRIMARY KEY,
  value TEXT NOT NULL
)
"#;

const SQL_UPSERT: &str = r#"
INSERT INTO kv (key, value) VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#;

/// Never returns errors to callers. With no usable connection every read is
/// empty and every write is dropped; the in-memory lists stay authoritative.
pub struct Store {
    conn: Option<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Self {
        match Self::try_open(path) {
            Ok(conn) => {
                info!("Using store {}", path.display());
                Self { conn: Some(conn) }
            }
            Err(e) => {
                warn!(
                    "Failed to open store {} ({e}); saved lists will not persist this session",
                    path.display()
                );
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        let conn = Connection::open_in_memory()
            .and_then(|c| c.execute_batch(SQL_INIT).map(|_| c))
            .map_err(|e| warn!("in-memory store unavailable: {e}"))
            .ok();
        Self { conn }
    }

    fn try_open(path: &Path) -> rusqlite::Result<Connection> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        let _ = conn.busy_timeout(Duration::from_secs(5));
        conn.execute_batch(SQL_INIT)?;
        Ok(conn)
    }

    pub fn read_value(&self, key: &str) -> Option<String> {
        let conn = self.conn.as_ref()?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional()
        .unwrap_or_else(|e| {
            warn!("store read `{key}` failed: {e}");
            None
        })
    }

    pub fn write_value(&self, key: &str, value: &str) {
        let Some(conn) = self.conn.as_ref() else {
            return;
        };
        if let Err(e) = conn.execute(SQL_UPSERT, [key, value]) {
            warn!("store write `{key}` failed: {e}");
        }
    }

    /// Missing key or unparseable data reads as an empty list.
    pub fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_list_opt(key).unwrap_or_default()
    }

    /// `None` when the key is absent or unreadable; a stored `[]` is
    /// `Some(vec![])`.
    pub fn read_list_opt<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = self.read_value(key)?;
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str::<Vec<T>>(&raw)
            .map_err(|e| warn!("stored `{key}` is not a valid list ({e}); ignoring it"))
            .ok()
    }

    pub fn write_list<T: Serialize>(&self, key: &str, value: &[T]) {
        match serde_json::to_string(value) {
            Ok(txt) => self.write_value(key, &txt),
            Err(e) => warn!("could not serialize `{key}`: {e}"),
        }
    }
}
