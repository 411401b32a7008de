// src/tmdb.rs: typed wrapper over the TMDB v3 endpoints the dashboard uses
use std::cmp::Ordering;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;

pub const TMDB_BASE: &str = crate::config::DEFAULT_TMDB_BASE;
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w780";

const REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("TMDB error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("TMDB request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("TMDB response could not be decoded: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, TmdbError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GenreResponse {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Popularity,
    ReleaseDate,
    VoteAverage,
}

impl SortBy {
    pub const ALL: [Self; 3] = [Self::Popularity, Self::ReleaseDate, Self::VoteAverage];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity.desc",
            Self::ReleaseDate => "release_date.desc",
            Self::VoteAverage => "vote_average.desc",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Popularity => "Sort: Popularity",
            Self::ReleaseDate => "Sort: Release Date",
            Self::VoteAverage => "Sort: Rating",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| format!("unknown sort key `{s}`"))
    }
}

/// The list operations the dashboard needs from a movie provider.
pub trait Catalog: Send + Sync {
    fn fetch_genres(&self) -> Result<Vec<TmdbGenre>>;

    /// Free-text search. Empty query yields nothing and issues no request.
    fn search_movies(
        &self,
        query: &str,
        sort_by: SortBy,
        genre_id: Option<i64>,
    ) -> Result<Vec<TmdbMovie>>;

    /// Provider-side filter and sort.
    fn discover_movies(&self, sort_by: SortBy, genre_id: Option<i64>) -> Result<Vec<TmdbMovie>>;

    fn fetch_upcoming(&self) -> Result<Vec<TmdbMovie>>;
}

pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent("cinevault/0.3")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        Self::new(&cfg.tmdb_base_url, &cfg.api_key_or_empty())
    }

    pub fn with_client(http: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// `api_key` always goes first; empty-valued params are dropped.
    fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (k, v) in params {
            if v.is_empty() {
                continue;
            }
            url.push('&');
            url.push_str(k);
            url.push('=');
            url.push_str(&urlencoding::encode(v));
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.endpoint_url(path, params);
        debug!("TMDB GET {path}");

        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(TmdbError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text()?;
        serde_json::from_str::<T>(&text).map_err(|e| TmdbError::Decode(format!("{path}: {e}")))
    }
}

impl Catalog for TmdbClient {
    fn fetch_genres(&self) -> Result<Vec<TmdbGenre>> {
        let data: GenreResponse =
            self.get_json("/genre/movie/list", &[("language", "en-US".into())])?;
        Ok(data.genres)
    }

    fn search_movies(
        &self,
        query: &str,
        sort_by: SortBy,
        genre_id: Option<i64>,
    ) -> Result<Vec<TmdbMovie>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let data: ListResponse<TmdbMovie> = self.get_json(
            "/search/movie",
            &[
                ("query", query.to_string()),
                ("include_adult", "false".into()),
                ("language", "en-US".into()),
            ],
        )?;

        let results = filter_by_genre(data.results, genre_id);
        Ok(apply_sort(results, sort_by))
    }

    fn discover_movies(&self, sort_by: SortBy, genre_id: Option<i64>) -> Result<Vec<TmdbMovie>> {
        let data: ListResponse<TmdbMovie> = self.get_json(
            "/discover/movie",
            &[
                ("include_adult", "false".into()),
                ("language", "en-US".into()),
                ("sort_by", sort_by.as_str().into()),
                (
                    "with_genres",
                    genre_id.map(|g| g.to_string()).unwrap_or_default(),
                ),
            ],
        )?;
        Ok(data.results)
    }

    fn fetch_upcoming(&self) -> Result<Vec<TmdbMovie>> {
        let data: ListResponse<TmdbMovie> = self.get_json(
            "/movie/upcoming",
            &[("language", "en-US".into()), ("region", "US".into())],
        )?;
        Ok(data.results)
    }
}

/// Absolute poster URL, or "" when the provider has no poster.
pub fn poster_url(path: Option<&str>) -> String {
    match path {
        Some(p) if !p.is_empty() => format!("{IMAGE_BASE}{p}"),
        _ => String::new(),
    }
}

pub fn filter_by_genre(list: Vec<TmdbMovie>, genre_id: Option<i64>) -> Vec<TmdbMovie> {
    match genre_id {
        Some(g) => list.into_iter().filter(|m| m.genre_ids.contains(&g)).collect(),
        None => list,
    }
}

/// Client-side ordering for search results (the search endpoint has no sort).
pub fn apply_sort(mut list: Vec<TmdbMovie>, sort_by: SortBy) -> Vec<TmdbMovie> {
    match sort_by {
        SortBy::ReleaseDate => list.sort_by(|a, b| {
            let ad = a.release_date.as_deref().unwrap_or("");
            let bd = b.release_date.as_deref().unwrap_or("");
            bd.cmp(ad)
        }),
        SortBy::VoteAverage => list.sort_by(|a, b| {
            let av = a.vote_average.unwrap_or(0.0);
            let bv = b.vote_average.unwrap_or(0.0);
            bv.partial_cmp(&av).unwrap_or(Ordering::Equal)
        }),
        SortBy::Popularity => {}
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    fn movie(id: i64, date: Option<&str>, vote: f64, genres: &[i64]) -> TmdbMovie {
        TmdbMovie {
            id,
            title: format!("Movie {id}"),
            release_date: date.map(str::to_string),
            poster_path: None,
            vote_average: Some(vote),
            genre_ids: genres.to_vec(),
            overview: None,
        }
    }

    /// One-shot HTTP server; returns its base URL and a receiver for the request line.
    fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let req = String::from_utf8_lossy(&buf);
            let _ = tx.send(req.lines().next().unwrap_or_default().to_string());
            let resp = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(resp.as_bytes());
        });
        (format!("http://{addr}/3"), rx)
    }

    fn local_client(base: &str, key: &str) -> TmdbClient {
        let http = Client::builder().no_proxy().build().unwrap();
        TmdbClient::with_client(http, base, key)
    }

    #[test]
    fn release_date_sort_is_descending() {
        let list = vec![
            movie(1, Some("2023-01-01"), 5.0, &[]),
            movie(2, Some("2024-06-15"), 5.0, &[]),
            movie(3, Some("2022-12-31"), 5.0, &[]),
        ];
        let sorted = apply_sort(list, SortBy::ReleaseDate);
        let dates: Vec<_> = sorted
            .iter()
            .map(|m| m.release_date.clone().unwrap())
            .collect();
        assert_eq!(dates, ["2024-06-15", "2023-01-01", "2022-12-31"]);
    }

    #[test]
    fn missing_dates_sort_last() {
        let list = vec![movie(1, None, 0.0, &[]), movie(2, Some("2001-01-01"), 0.0, &[])];
        let ids: Vec<_> = apply_sort(list, SortBy::ReleaseDate).iter().map(|m| m.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn vote_sort_and_popularity_keeps_order() {
        let list = vec![
            movie(1, None, 6.1, &[]),
            movie(2, None, 8.4, &[]),
            movie(3, None, 7.0, &[]),
        ];
        let ids: Vec<_> = apply_sort(list.clone(), SortBy::VoteAverage)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, [2, 3, 1]);

        let ids: Vec<_> = apply_sort(list, SortBy::Popularity).iter().map(|m| m.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn genre_filter_keeps_matching_only() {
        let list = vec![movie(1, None, 0.0, &[28, 12]), movie(2, None, 0.0, &[18])];
        let kept = filter_by_genre(list.clone(), Some(18));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 2);
        assert_eq!(filter_by_genre(list, None).len(), 2);
    }

    #[test]
    fn sort_keys_round_trip_through_strings() {
        for s in SortBy::ALL {
            assert_eq!(s.as_str().parse::<SortBy>(), Ok(s));
        }
        assert!("title.asc".parse::<SortBy>().is_err());
        assert!("Popularity.desc".parse::<SortBy>().is_err());
    }

    #[test]
    fn poster_url_needs_a_path() {
        assert_eq!(poster_url(None), "");
        assert_eq!(poster_url(Some("")), "");
        assert_eq!(
            poster_url(Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w780/abc.jpg"
        );
    }

    #[test]
    fn endpoint_url_encodes_and_skips_empty() {
        let client = local_client("https://api.example.org/3/", "k y");
        let url = client.endpoint_url(
            "/discover/movie",
            &[
                ("sort_by", "popularity.desc".into()),
                ("with_genres", String::new()),
            ],
        );
        assert_eq!(
            url,
            "https://api.example.org/3/discover/movie?api_key=k%20y&sort_by=popularity.desc"
        );
    }

    #[test]
    fn empty_search_makes_no_request() {
        // Nothing listens on the discard port; any request would be a transport error.
        let client = local_client("http://127.0.0.1:9/3", "key");
        let out = client.search_movies("", SortBy::ReleaseDate, Some(18)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn search_filters_and_sorts_client_side() {
        let body = r#"{"page":1,"results":[
            {"id":1,"title":"A","release_date":"2020-01-01","poster_path":null,"vote_average":7.0,"genre_ids":[18]},
            {"id":2,"title":"B","release_date":"2024-01-01","poster_path":"/b.jpg","vote_average":6.0,"genre_ids":[18,28]},
            {"id":3,"title":"C","release_date":"2025-01-01","poster_path":null,"vote_average":9.0,"genre_ids":[28]}
        ]}"#;
        let (base, rx) = serve_once(200, body);
        let client = local_client(&base, "secret");

        let out = client
            .search_movies("blade runner", SortBy::ReleaseDate, Some(18))
            .unwrap();
        let ids: Vec<_> = out.iter().map(|m| m.id).collect();
        assert_eq!(ids, [2, 1]);

        let line = rx.recv().unwrap();
        assert!(line.starts_with(
            "GET /3/search/movie?api_key=secret&query=blade%20runner&include_adult=false&language=en-US "
        ));
    }

    #[test]
    fn non_success_status_carries_code_and_body() {
        let (base, _rx) = serve_once(401, r#"{"status_message":"Invalid API key"}"#);
        let client = local_client(&base, "");
        match client.fetch_genres() {
            Err(TmdbError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn genres_and_upcoming_decode() {
        let (base, rx) = serve_once(200, r#"{"genres":[{"id":18,"name":"Drama"}]}"#);
        let genres = local_client(&base, "k").fetch_genres().unwrap();
        assert_eq!(genres, vec![TmdbGenre { id: 18, name: "Drama".into() }]);
        assert!(rx
            .recv()
            .unwrap()
            .starts_with("GET /3/genre/movie/list?api_key=k&language=en-US "));

        let (base, rx) = serve_once(200, r#"{"results":[{"id":9,"title":"Soon","genre_ids":[]}]}"#);
        let up = local_client(&base, "k").fetch_upcoming().unwrap();
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].vote_average, None);
        assert!(rx
            .recv()
            .unwrap()
            .starts_with("GET /3/movie/upcoming?api_key=k&language=en-US&region=US "));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let (base, _rx) = serve_once(200, "not json");
        let err = local_client(&base, "k")
            .discover_movies(SortBy::Popularity, None)
            .unwrap_err();
        assert!(matches!(err, TmdbError::Decode(_)));
    }
}
