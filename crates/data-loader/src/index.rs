//! Dataset building: join, decode, clean, enrich, truncate.
//!
//! This module turns the two raw tables into the run's `Catalog`:
//! 1. Left-join movies with credits on the movie id
//! 2. Decode the seven JSON list columns into name lists
//! 3. Drop rows missing overview, release date or runtime
//! 4. Merge the cached enrichment attributes
//! 5. Keep only the first N rows
//!
//! Steps 1-3 produce a `CleanedDataset`. Step 4 is split off because the
//! enrichment stage needs the cleaned ids before the merge can happen, and
//! step 5 (`Catalog::head`) leaves the merged catalog intact for lookups.

use crate::error::Result;
use crate::parser::{self, RawCreditRow, RawMovieRow};
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Default row cutoff applied after the enrichment merge
pub const DEFAULT_CUTOFF: usize = 1035;

/// Rows that survived decoding and cleaning, enrichment not yet merged
#[derive(Debug, Clone, Default)]
pub struct CleanedDataset {
    rows: Vec<MovieRecord>,
}

impl CleanedDataset {
    /// Load both tables from disk and run join + decode + clean.
    ///
    /// The two files are parsed in parallel with `rayon::join`.
    pub fn load_from_files(movies_path: &Path, credits_path: &Path) -> Result<Self> {
        info!(
            "Loading TMDb tables from {} and {}",
            movies_path.display(),
            credits_path.display()
        );

        let (movies, credits) = rayon::join(
            || parser::read_movies(movies_path),
            || parser::read_credits(credits_path),
        );
        let movies = movies?;
        let credits = credits?;
        info!("Read {} movie rows, {} credit rows", movies.len(), credits.len());

        Self::from_tables(movies, credits)
    }

    /// Join + decode + clean already-parsed tables
    pub fn from_tables(movies: Vec<RawMovieRow>, credits: Vec<RawCreditRow>) -> Result<Self> {
        let joined = join_tables(movies, credits)?;
        let before = joined.len();
        let rows = drop_incomplete(joined);
        info!(
            "Dropped {} incomplete rows, {} remain",
            before - rows.len(),
            rows.len()
        );
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[MovieRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ids of the first `cutoff` cleaned rows, the ones worth enriching
    pub fn enrichment_targets(&self, cutoff: usize) -> Vec<MovieId> {
        self.rows.iter().take(cutoff).map(|row| row.id).collect()
    }

    /// Merge enrichment attributes into every cleaned row.
    ///
    /// `lookup` returns the cached attributes for an id, or `None` if the
    /// cache has nothing; such rows keep an all-null `Enrichment`. The
    /// cutoff is applied afterwards with `Catalog::head`.
    pub fn merge<F>(self, lookup: F) -> Catalog
    where
        F: Fn(MovieId) -> Option<Enrichment>,
    {
        let mut rows = self.rows;
        let mut matched = 0usize;
        for row in &mut rows {
            if let Some(enrichment) = lookup(row.id) {
                row.enrichment = enrichment;
                matched += 1;
            }
        }
        info!(
            "Merged enrichment: {} movies, {} with cached attributes",
            rows.len(),
            matched
        );
        Catalog::from_records(rows)
    }
}

/// Left-join movies with credits and decode every JSON list column.
///
/// Every movie row is kept. A movie without a credits row gets empty
/// cast and crew lists; if credits repeat a movie id, the first row wins.
/// Rows are decoded in parallel but the output keeps input order.
pub fn join_tables(movies: Vec<RawMovieRow>, credits: Vec<RawCreditRow>) -> Result<Vec<MovieRecord>> {
    let mut credits_by_id: HashMap<MovieId, RawCreditRow> = HashMap::with_capacity(credits.len());
    for credit in credits {
        credits_by_id.entry(credit.movie_id).or_insert(credit);
    }

    let missing = movies
        .iter()
        .filter(|m| !credits_by_id.contains_key(&m.id))
        .count();
    if missing > 0 {
        debug!("{} movies have no credits row", missing);
    }

    movies
        .into_par_iter()
        .map(|movie| {
            let credit = credits_by_id.get(&movie.id);
            decode_row(movie, credit)
        })
        .collect()
}

fn decode_row(movie: RawMovieRow, credit: Option<&RawCreditRow>) -> Result<MovieRecord> {
    let id = movie.id;
    let (cast, crew) = match credit {
        Some(credit) => (
            parser::extract_names(&credit.cast, "cast", id)?,
            parser::extract_names(&credit.crew, "crew", id)?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    Ok(MovieRecord {
        id,
        genres: parser::extract_names(&movie.genres, "genres", id)?,
        keywords: parser::extract_names(&movie.keywords, "keywords", id)?,
        production_companies: parser::extract_names(
            &movie.production_companies,
            "production_companies",
            id,
        )?,
        production_countries: parser::extract_names(
            &movie.production_countries,
            "production_countries",
            id,
        )?,
        spoken_languages: parser::extract_names(&movie.spoken_languages, "spoken_languages", id)?,
        cast,
        crew,
        title: movie.title,
        original_title: movie.original_title,
        // Missing required values stay empty/NaN until drop_incomplete removes the row
        overview: movie.overview.unwrap_or_default(),
        release_date: movie.release_date.unwrap_or_default(),
        runtime: movie.runtime.unwrap_or(f64::NAN),
        budget: movie.budget,
        homepage: movie.homepage,
        original_language: movie.original_language,
        enrichment: Enrichment::default(),
    })
}

/// A row is complete when overview, release date and runtime are all present
fn is_complete(row: &MovieRecord) -> bool {
    !row.overview.is_empty() && !row.release_date.is_empty() && !row.runtime.is_nan()
}

/// Remove every row missing a required field, keeping order
pub fn drop_incomplete(rows: Vec<MovieRecord>) -> Vec<MovieRecord> {
    rows.into_iter().filter(is_complete).collect()
}
