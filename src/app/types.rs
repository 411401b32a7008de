// src/app/types.rs
use serde::{Deserialize, Serialize};

use crate::tmdb::{self, TmdbGenre, TmdbMovie};

// ---- cross-thread messages ----
pub enum LoadMsg {
    Genres(tmdb::Result<Vec<TmdbGenre>>),
    Cycle {
        generation: u64,
        /// Search sequence at dispatch; a newer search keeps its cards.
        search_seq: u64,
        result: tmdb::Result<(Vec<TmdbMovie>, Vec<TmdbMovie>)>,
    },
    Search {
        generation: u64,
        seq: u64,
        result: tmdb::Result<Vec<TmdbMovie>>,
    },
}

// ---- display ----

/// UI-ready projection of a provider movie.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub rating: f64,
    pub genres: Vec<String>,
    /// Release date for upcoming titles, the year otherwise.
    pub runtime: String,
    pub poster: String,
    pub overview: Option<String>,
}

/// The movie a log dialog or details dialog was opened for.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieRef {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub genres: Vec<String>,
    pub year: Option<String>,
    pub overview: Option<String>,
}

impl From<&MovieCard> for MovieRef {
    fn from(card: &MovieCard) -> Self {
        Self {
            id: card.id,
            title: card.title.clone(),
            poster: card.poster.clone(),
            genres: card.genres.clone(),
            year: Some(card.year.clone()),
            overview: card.overview.clone(),
        }
    }
}

// ---- persisted entries (camelCase keeps the stored shape stable) ----
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedItem {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub genres: Vec<String>,
    pub user_rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date_watched: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub genres: Vec<String>,
    pub added_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

// ---- dialogs ----
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogMode {
    Add,
    Edit,
}

/// Open log dialog: the target plus the unsaved rating/notes.
#[derive(Clone, Debug, PartialEq)]
pub struct LogDraft {
    pub movie: MovieRef,
    pub mode: LogMode,
    pub rating: f64,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDetails {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster: Option<String>,
    pub year: Option<String>,
    pub genres: Vec<String>,
}

impl From<&ActiveDetails> for MovieRef {
    fn from(d: &ActiveDetails) -> Self {
        Self {
            id: d.id,
            title: d.title.clone(),
            poster: d.poster.clone().unwrap_or_default(),
            genres: d.genres.clone(),
            year: d.year.clone(),
            overview: Some(d.overview.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchStatus {
    Watched,
    Planned,
    Untracked,
}

impl WatchStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Watched => "Watched",
            Self::Planned => "Saved for later",
            Self::Untracked => "None",
        }
    }
}

// ---- UI controls ----
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark Mode",
            Self::Light => "Light Mode",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PosterState {
    #[default]
    Pending, // queued or downloading
    Cached,  // file on disk, not uploaded yet
    Ready,   // texture uploaded
    Failed,  // not retried this session
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parses_stored_names_only() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Light".parse::<Theme>().is_err());
        assert!("".parse::<Theme>().is_err());
    }

    #[test]
    fn theme_label_names_the_current_mode() {
        assert_eq!(Theme::Dark.label(), "Dark Mode");
        assert_eq!(Theme::Light.label(), "Light Mode");
        assert_eq!(Theme::Dark.toggled().label(), "Light Mode");
    }
}
