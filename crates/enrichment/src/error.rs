//! Errors raised by the attribute cache and the enrichment source.

use thiserror::Error;

/// Errors that can occur while reading/writing the cache or calling the API
///
/// A non-success HTTP status is *not* an error: it is reported as
/// `Lookup::Unavailable` and the movie simply stays unenriched.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// Transport failure, timeout or undecodable response body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The cache (or miss sidecar) exists but is not the expected JSON shape
    #[error("Cache file {path} is corrupt: {source}")]
    CorruptCache {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode cache: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EnrichmentError>;
