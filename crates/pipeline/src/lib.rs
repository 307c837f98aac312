//! Recommendation pipeline over the movie graph and catalog.
//!
//! This crate provides:
//! - Filter trait and the genre/cast/crew filters
//! - FilterPipeline for intersecting filter subsets
//! - Genre-overlap scoring and the composite ranking order
//! - The three strategies and the RecommendationEngine that wraps them
//!
//! ## Strategies
//! 1. **Strict genre match**: nodes carrying every requested genre
//! 2. **Liked history**: rank by summed genre overlap with liked movies
//! 3. **Preferences**: filter by genre/cast/crew, rank survivors by overlap
//!    with each other
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Preferences, RecommendationEngine};
//!
//! let engine = RecommendationEngine::new(graph.clone(), catalog.clone()).with_top_k(5);
//!
//! let action = engine.by_genres(&["Action".to_string()]);
//! let similar = engine.by_liked(&[19995]);
//! let picks = engine.by_preferences(&Preferences::new().with_cast_name("Tom Hanks"));
//! ```

pub mod engine;
pub mod filter_pipeline;
pub mod filters;
pub mod scoring;
pub mod strategies;
pub mod traits;
pub mod types;

// Re-export main types
pub use engine::RecommendationEngine;
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
pub use types::{EmptyMatchPolicy, Preferences, RankedCandidate, DEFAULT_TOP_K};
