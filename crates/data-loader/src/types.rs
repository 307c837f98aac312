//! Core domain types for the TMDb movie catalog.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (MovieId)
//! - `Option<T>` for nullable attributes instead of sentinel values
//! - Derive macros for common traits (including serde for the cache file)
//! - HashMap indices that point back into an ordered Vec

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie (the TMDb `id` column)
pub type MovieId = u32;

// =============================================================================
// Enrichment
// =============================================================================

/// The five attributes that come from the external movie API rather than
/// from the CSV tables.
///
/// This is also the fixed shape of one value in the on-disk cache file, so
/// the field names double as the JSON keys. Every field may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub popularity: Option<f64>,
    pub revenue: Option<f64>,
    pub tagline: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
}

// =============================================================================
// Movie Record
// =============================================================================

/// One row of the joined, decoded and cleaned dataset.
///
/// Rust concepts:
/// - Required columns (overview, release date, runtime) are plain values;
///   a row lacking any of them never becomes a `MovieRecord`
/// - Optional scalars stay `Option<T>`
/// - Nested JSON columns are flattened into `Vec<String>` name lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    /// Display title, used for lookups by title
    pub title: String,
    /// Title in the original language; this is what graph nodes are labelled with
    pub original_title: String,
    pub overview: String,
    pub release_date: String,
    /// Runtime in minutes
    pub runtime: f64,
    pub budget: Option<u64>,
    pub homepage: Option<String>,
    pub original_language: Option<String>,

    // Flattened name lists, source order preserved
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub cast: Vec<String>,
    pub crew: Vec<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,

    /// Filled in from the attribute cache; all-null when the cache has no entry
    pub enrichment: Enrichment,
}

// =============================================================================
// Catalog - The Core In-Memory Index
// =============================================================================

/// An ordered set of movies plus lookup indices.
///
/// A run keeps two: every cleaned row for lookups and validation, and its
/// first N rows (`head`) for the graph and the strategies.
///
/// Row order matters (strategies fall back to it for ties), so movies live
/// in a Vec and the HashMaps store positions into it.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,
    pub(crate) id_index: HashMap<MovieId, usize>,
    pub(crate) title_index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from rows that are already in their final order.
    ///
    /// If an id or title repeats, the first row wins the index slot.
    pub fn from_records(movies: Vec<MovieRecord>) -> Self {
        let mut id_index = HashMap::with_capacity(movies.len());
        let mut title_index = HashMap::with_capacity(movies.len());
        for (pos, movie) in movies.iter().enumerate() {
            id_index.entry(movie.id).or_insert(pos);
            title_index.entry(movie.title.clone()).or_insert(pos);
        }
        Self {
            movies,
            id_index,
            title_index,
        }
    }

    /// The first `n` movies as a catalog of their own
    pub fn head(&self, n: usize) -> Catalog {
        Catalog::from_records(self.movies.iter().take(n).cloned().collect())
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&MovieRecord> {
        self.id_index.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Exact (case-sensitive) title lookup
    pub fn find_by_title(&self, title: &str) -> Option<&MovieRecord> {
        self.title_index.get(title).map(|&pos| &self.movies[pos])
    }

    /// All movies in dataset order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Every genre name that appears in at least one movie
    pub fn genre_vocabulary(&self) -> BTreeSet<&str> {
        self.movies
            .iter()
            .flat_map(|m| m.genres.iter().map(String::as_str))
            .collect()
    }

    /// Number of genre occurrences per genre name, most frequent first.
    ///
    /// Ties are broken alphabetically so the output is stable.
    pub fn genre_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for genre in self.movies.iter().flat_map(|m| m.genres.iter()) {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(genre, count)| (genre.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}
