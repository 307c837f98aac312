//! Filter to keep only movies tagged with one genre.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps movies whose genre list contains `genre`
pub struct GenreFilter {
    genre: String,
}

impl GenreFilter {
    pub fn new(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn matches(&self, movie: &MovieRecord) -> bool {
        movie.genres.iter().any(|g| *g == self.genre)
    }
}
