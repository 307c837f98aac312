//! Request and result types shared by the three strategies.

use data_loader::{MovieId, MovieRecord};
use serde::{Deserialize, Serialize};

/// Default number of recommendations returned
pub const DEFAULT_TOP_K: usize = 5;

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub movie_id: MovieId,
    pub title: String,
    /// Shared genre count. Summed over the liked movies or the other
    /// survivors for liked-history and preference ranking, where it is the
    /// primary sort key; against the requested genres for strict genre match.
    pub genre_overlap: usize,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
}

impl RankedCandidate {
    /// Candidate for `movie`, labelled with its display title
    pub fn from_record(movie: &MovieRecord, genre_overlap: usize) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            genre_overlap,
            vote_average: movie.enrichment.vote_average,
            popularity: movie.enrichment.popularity,
        }
    }
}

/// Optional constraints for preference-based recommendations.
///
/// Blank or whitespace-only values count as not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub genre: Option<String>,
    pub cast_name: Option<String>,
    pub crew_name: Option<String>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_cast_name(mut self, name: impl Into<String>) -> Self {
        self.cast_name = Some(name.into());
        self
    }

    pub fn with_crew_name(mut self, name: impl Into<String>) -> Self {
        self.crew_name = Some(name.into());
        self
    }

    pub fn genre(&self) -> Option<&str> {
        supplied(&self.genre)
    }

    pub fn cast_name(&self) -> Option<&str> {
        supplied(&self.cast_name)
    }

    pub fn crew_name(&self) -> Option<&str> {
        supplied(&self.crew_name)
    }

    /// True when no preference was actually given
    pub fn is_empty(&self) -> bool {
        self.genre().is_none() && self.cast_name().is_none() && self.crew_name().is_none()
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// What a supplied preference that matches nothing does to the result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyMatchPolicy {
    /// The empty match empties the intersection: no recommendations
    #[default]
    Exclude,
    /// The preference is dropped as if it had not been supplied
    Ignore,
}
