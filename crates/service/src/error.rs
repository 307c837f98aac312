//! Errors surfaced to the user by the recommendation service.

use thiserror::Error;

/// Input that does not match the loaded catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unknown genres: {}", .0.join(", "))]
    UnknownGenres(Vec<String>),

    #[error("Movies not found: {}", .0.join(", "))]
    UnknownTitles(Vec<String>),

    #[error("No movie matches {0}")]
    MovieNotFound(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ServiceError>;
