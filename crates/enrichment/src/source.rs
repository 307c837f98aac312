//! External enrichment sources.
//!
//! `EnrichmentSource` is the seam between the worker stage and whatever
//! answers "what are the ratings for movie N?". Production uses
//! `TmdbClient`; tests plug in an in-memory source.

use crate::cache::CacheEntry;
use crate::error::Result;
use async_trait::async_trait;
use data_loader::MovieId;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default TMDb API root
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org";

/// Outcome of a lookup that reached the remote side
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The API returned the movie's attributes
    Found(CacheEntry),
    /// The API answered with a non-200 status: no data for this movie
    Unavailable { status: u16 },
}

/// Anything that can resolve enrichment attributes for a movie id.
///
/// `Err` means the request never produced an answer (timeout, connection
/// refused, garbage body); the stage treats that as "try again next run".
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Returns the name of this source (for logging)
    fn name(&self) -> &str;

    async fn fetch(&self, movie_id: MovieId) -> Result<Lookup>;
}

/// The subset of TMDb's `/3/movie/{id}` response we keep
#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    popularity: Option<f64>,
    revenue: Option<f64>,
    tagline: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u64>,
}

impl From<TmdbMovieDetails> for CacheEntry {
    fn from(details: TmdbMovieDetails) -> Self {
        CacheEntry {
            popularity: details.popularity,
            revenue: details.revenue,
            tagline: details.tagline,
            vote_average: details.vote_average,
            vote_count: details.vote_count,
        }
    }
}

/// TMDb movie-details client
#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a client whose every request gives up after `timeout`
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL of the details endpoint for one movie (without the api key)
    pub fn movie_url(&self, movie_id: MovieId) -> String {
        format!("{}/3/movie/{}", self.base_url, movie_id)
    }
}

#[async_trait]
impl EnrichmentSource for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn fetch(&self, movie_id: MovieId) -> Result<Lookup> {
        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("TMDb returned {} for movie {}", status, movie_id);
            return Ok(Lookup::Unavailable {
                status: status.as_u16(),
            });
        }

        let details: TmdbMovieDetails = response.json().await?;
        Ok(Lookup::Found(details.into()))
    }
}
