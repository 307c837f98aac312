//! Error types for the data-loader crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - `#[source]` chaining so csv errors keep their cause
//! - Error messages that carry the column and movie id at fault

use crate::types::MovieId;
use thiserror::Error;

/// Errors that can occur while loading and cleaning the TMDb tables
///
/// Rust concept: Using an enum for errors lets us handle different cases.
/// Rows with missing overview/release date/runtime are NOT errors; they are
/// dropped by the cleaning step. Only unreadable input ends up here.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// A CSV row could not be read or deserialized
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A structured column held something other than a JSON list of records
    ///
    /// The upstream data has to be fixed; we never guess at a repair.
    #[error("Malformed {column} field for movie {movie_id}: {reason}")]
    MalformedField {
        column: &'static str,
        movie_id: MovieId,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
