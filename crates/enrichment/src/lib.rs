//! # Enrichment Crate
//!
//! Per-movie popularity, revenue, tagline and vote data fetched from TMDb and
//! kept in a flat JSON cache so each movie is only ever requested once.
//!
//! ## Main Components
//!
//! - **cache**: The file-backed `AttributeCache` and its miss sidecar
//! - **source**: The `EnrichmentSource` trait and the `TmdbClient` implementation
//! - **stage**: `EnrichmentStage`, the bounded-concurrency fetch loop
//! - **error**: Error types for cache I/O and HTTP
//!
//! ## Example Usage
//!
//! ```ignore
//! use enrichment::{AttributeCache, EnrichmentStage, TmdbClient, DEFAULT_TMDB_BASE_URL};
//! use std::{sync::Arc, time::Duration};
//!
//! let mut cache = AttributeCache::load("data/cache.json")?;
//! let client = TmdbClient::new(api_key, DEFAULT_TMDB_BASE_URL, Duration::from_secs(10))?;
//! let report = EnrichmentStage::new(Arc::new(client))
//!     .with_concurrency(8)
//!     .run(&mut cache, &ids)
//!     .await?;
//! ```

pub mod cache;
pub mod error;
pub mod source;
pub mod stage;

pub use cache::{AttributeCache, CacheEntry};
pub use error::{EnrichmentError, Result};
pub use source::{EnrichmentSource, Lookup, TmdbClient, DEFAULT_TMDB_BASE_URL};
pub use stage::{EnrichmentReport, EnrichmentStage, DEFAULT_CONCURRENCY};
