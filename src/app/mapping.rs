// src/app/mapping.rs: provider records -> display cards
use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate};

use crate::app::types::MovieCard;
use crate::tmdb::{poster_url, TmdbGenre, TmdbMovie};

pub const MAX_CARDS: usize = 8;
pub const MAX_CARD_GENRES: usize = 2;
pub const YEAR_PLACEHOLDER: &str = " - ";
pub const UNKNOWN_GENRE: &str = "Unknown";
pub const STOCK_POSTER: &str =
    "https://images.unsplash.com/photo-1502134249126-9f3755a50d78?q=80&w=600&auto=format&fit=crop";

/// First `MAX_CARDS` movies in received order; callers sort beforehand.
pub fn map_movies(list: &[TmdbMovie], genres: &[TmdbGenre], is_upcoming: bool) -> Vec<MovieCard> {
    let genre_map: HashMap<i64, &str> = genres.iter().map(|g| (g.id, g.name.as_str())).collect();

    list.iter()
        .take(MAX_CARDS)
        .map(|movie| {
            let release = movie.release_date.as_deref().filter(|d| !d.is_empty());
            let year = release
                .and_then(|d| d.split('-').next())
                .unwrap_or(YEAR_PLACEHOLDER)
                .to_string();

            let runtime = match release {
                Some(d) if is_upcoming => format_date(d),
                _ => year.clone(),
            };

            let poster = match poster_url(movie.poster_path.as_deref()) {
                url if url.is_empty() => STOCK_POSTER.to_string(),
                url => url,
            };

            MovieCard {
                id: movie.id,
                title: movie.title.clone(),
                year,
                rating: rescale_rating(movie.vote_average),
                genres: resolve_genres(&movie.genre_ids, &genre_map),
                runtime,
                poster,
                overview: movie
                    .overview
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            }
        })
        .collect()
}

fn resolve_genres(ids: &[i64], genre_map: &HashMap<i64, &str>) -> Vec<String> {
    let names: Vec<String> = ids
        .iter()
        .filter_map(|id| genre_map.get(id))
        .take(MAX_CARD_GENRES)
        .map(|s| s.to_string())
        .collect();
    if names.is_empty() {
        vec![UNKNOWN_GENRE.to_string()]
    } else {
        names
    }
}

/// 10-point provider average -> 5-point scale, one decimal.
pub fn rescale_rating(vote_average: Option<f64>) -> f64 {
    match vote_average {
        Some(v) if v.is_finite() && v > 0.0 => ((v / 2.0 * 10.0).round() / 10.0).clamp(0.0, 5.0),
        _ => 0.0,
    }
}

/// "Jan 05, 2025" from a plain date or an RFC 3339 timestamp; anything else
/// comes back unchanged.
pub fn format_date(s: &str) -> String {
    const FMT: &str = "%b %d, %Y";
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.format(FMT).to_string();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return ts.with_timezone(&Local).format(FMT).to_string();
    }
    s.to_string()
}
