//! # Data Loader Crate
//!
//! This crate turns the TMDb 5000 movie and credit tables into the run's
//! in-memory `Catalog`.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, Enrichment, Catalog)
//! - **parser**: Read the CSV tables and decode their JSON list columns
//! - **index**: Join, clean and merge enrichment into a Catalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CleanedDataset;
//! use std::path::Path;
//!
//! let cleaned = CleanedDataset::load_from_files(
//!     Path::new("data/tmdb_5000_movies.csv"),
//!     Path::new("data/tmdb_5000_credits.csv"),
//! )?;
//!
//! // No enrichment available: every movie keeps null ratings
//! let full = cleaned.merge(|_| None);
//! let catalog = full.head(1035);
//! println!("{} of {} movies", catalog.len(), full.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{CleanedDataset, DEFAULT_CUTOFF};
pub use types::{
    // Type aliases
    MovieId,
    // Core types
    MovieRecord,
    Enrichment,
    Catalog,
};
