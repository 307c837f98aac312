//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to the catalog.

use data_loader::MovieRecord;

/// Core trait for catalog filters.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared with rayon workers
/// - Filters only answer "does this movie qualify?"; the pipeline decides how
///   the answers of several filters combine
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// True if `movie` belongs to this filter's subset
    fn matches(&self, movie: &MovieRecord) -> bool;
}
