use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps movies whose cast includes one actor
pub struct CastFilter {
    name: String,
}

impl CastFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Filter for CastFilter {
    fn name(&self) -> &str {
        "CastFilter"
    }

    fn matches(&self, movie: &MovieRecord) -> bool {
        movie.cast.iter().any(|n| *n == self.name)
    }
}
