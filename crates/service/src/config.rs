//! Run configuration.
//!
//! Every field has a default so a bare `RunConfig::default()` works against
//! the conventional `data/` layout. The CLI overrides fields from flags and
//! environment variables.

use data_loader::DEFAULT_CUTOFF;
use enrichment::{DEFAULT_CONCURRENCY, DEFAULT_TMDB_BASE_URL};
use pipeline::{EmptyMatchPolicy, DEFAULT_TOP_K};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the TMDb enrichment stage
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Without a key the stage is skipped and only cached data is used
    pub api_key: Option<String>,
    pub base_url: String,
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Re-request ids recorded as misses by earlier runs
    pub retry_misses: bool,
}

impl EnrichmentConfig {
    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(10),
            retry_misses: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub movies_path: PathBuf,
    pub credits_path: PathBuf,
    pub cache_path: PathBuf,
    pub graph_path: PathBuf,
    /// Rows kept after the enrichment merge
    pub cutoff: usize,
    /// Recommendations returned per request
    pub top_k: usize,
    pub empty_match_policy: EmptyMatchPolicy,
    pub enrichment: EnrichmentConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            movies_path: PathBuf::from("data/tmdb_5000_movies.csv"),
            credits_path: PathBuf::from("data/tmdb_5000_credits.csv"),
            cache_path: PathBuf::from("data/tmdb_cache.json"),
            graph_path: PathBuf::from("data/movie_graph.json"),
            cutoff: DEFAULT_CUTOFF,
            top_k: DEFAULT_TOP_K,
            empty_match_policy: EmptyMatchPolicy::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.cutoff, 1035);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.empty_match_policy, EmptyMatchPolicy::Exclude);
        assert_eq!(config.enrichment.base_url, "https://api.themoviedb.org");
        assert!(config.enrichment.api_key().is_none());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = EnrichmentConfig {
            api_key: Some("   ".to_string()),
            ..EnrichmentConfig::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
