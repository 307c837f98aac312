//! Parser for the TMDb 5000 CSV tables.
//!
//! This module handles reading the two input tables:
//! - tmdb_5000_movies.csv: one row per movie, several JSON-encoded list columns
//! - tmdb_5000_credits.csv: movie_id, title, cast (JSON), crew (JSON)
//!
//! and decoding the JSON list columns into flat name lists.
//!
//! Rust concepts you'll learn here:
//! - Deserializing CSV rows straight into structs with serde
//! - `Option<T>` for empty cells
//! - Mapping foreign errors into our own error enum with context

use crate::error::{DataLoadError, Result};
use crate::types::MovieId;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// One row of the movies table, before any decoding.
///
/// Columns we don't use (status, the CSV's own popularity/vote columns, ...)
/// are ignored by serde. Empty cells become `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovieRow {
    pub id: MovieId,
    pub title: String,
    pub original_title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<f64>,
    pub budget: Option<u64>,
    pub homepage: Option<String>,
    pub original_language: Option<String>,
    pub genres: String,
    pub keywords: String,
    pub production_companies: String,
    pub production_countries: String,
    pub spoken_languages: String,
}

/// One row of the credits table
#[derive(Debug, Clone, Deserialize)]
pub struct RawCreditRow {
    pub movie_id: MovieId,
    pub cast: String,
    pub crew: String,
}

/// Read every row of a CSV file into `T`
fn read_table<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|source| DataLoadError::Csv {
        file: file.clone(),
        source,
    })?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|source| DataLoadError::Csv {
            file: file.clone(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse the movies table
pub fn read_movies(path: &Path) -> Result<Vec<RawMovieRow>> {
    read_table(path)
}

/// Parse the credits table
pub fn read_credits(path: &Path) -> Result<Vec<RawCreditRow>> {
    read_table(path)
}

/// Decode one JSON list column and pull out the `name` of each record.
///
/// Example: `[{"id": 28, "name": "Action"}, {"id": 12}]` -> `["Action"]`
///
/// Records without a string `name` are skipped. Anything that is not a JSON
/// list is a hard error: the upstream data needs fixing.
pub fn extract_names(raw: &str, column: &'static str, movie_id: MovieId) -> Result<Vec<String>> {
    let records: Vec<Value> =
        serde_json::from_str(raw).map_err(|e| DataLoadError::MalformedField {
            column,
            movie_id,
            reason: e.to_string(),
        })?;

    Ok(records
        .iter()
        .filter_map(|record| record.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}
