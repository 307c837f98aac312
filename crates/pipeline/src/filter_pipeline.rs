//! The FilterPipeline combines several filters into one subset.
//!
//! Each filter selects a subset of the input; the pipeline returns the
//! intersection of those subsets. What happens when one filter selects
//! nothing at all is decided by the pipeline's `EmptyMatchPolicy`.

use crate::traits::Filter;
use crate::types::EmptyMatchPolicy;
use data_loader::MovieRecord;
use tracing::debug;

/// Intersects the subsets selected by a list of filters.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .with_policy(EmptyMatchPolicy::Ignore)
///     .add_filter(GenreFilter::new("Drama"))
///     .add_filter(CastFilter::new("Tom Hanks"));
///
/// let survivors = pipeline.apply(catalog.movies());
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
    policy: EmptyMatchPolicy,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline (policy `Exclude`).
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            policy: EmptyMatchPolicy::default(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn with_policy(mut self, policy: EmptyMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply every filter to `movies`, keeping input order.
    ///
    /// ## Algorithm
    /// For each filter in order:
    /// 1. Compute its subset of the full input
    /// 2. If the subset is empty: `Exclude` returns nothing, `Ignore` skips
    ///    the filter
    /// 3. Otherwise narrow the running result to movies in that subset
    ///
    /// With no filters every movie survives.
    pub fn apply<'a>(&self, movies: &'a [MovieRecord]) -> Vec<&'a MovieRecord> {
        let mut current: Vec<&'a MovieRecord> = movies.iter().collect();

        for filter in &self.filters {
            let subset_size = movies.iter().filter(|m| filter.matches(m)).count();
            debug!("Filter {} matches {} movies", filter.name(), subset_size);

            if subset_size == 0 {
                match self.policy {
                    EmptyMatchPolicy::Exclude => {
                        debug!("Filter {} matched nothing, excluding all", filter.name());
                        return Vec::new();
                    }
                    EmptyMatchPolicy::Ignore => {
                        debug!("Filter {} matched nothing, ignoring it", filter.name());
                        continue;
                    }
                }
            }

            current.retain(|m| filter.matches(m));
            debug!(
                "Filter applied: {} (remaining: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
