//! # Service Crate
//!
//! Ties the workspace together for the command-line front end.
//!
//! - **config**: `RunConfig` and `EnrichmentConfig`
//! - **orchestrator**: `BuildOrchestrator` runs the full batch build or
//!   loads an offline `Session`
//! - **recommend**: `RecommendationService`, input validation and detail views
//! - **error**: `ServiceError` for input that doesn't match the catalog

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod recommend;

pub use config::{EnrichmentConfig, RunConfig};
pub use error::ServiceError;
pub use orchestrator::{BuildOrchestrator, BuildOutput, Session};
pub use recommend::{DetailView, MovieDetails, MovieQuery, RecommendationService};
