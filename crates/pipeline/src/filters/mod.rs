//! Filter implementations for the preference strategy.
//!
//! Each filter keeps the movies whose name list contains one exact,
//! case-sensitive value.

pub mod cast;
pub mod crew;
pub mod genre;

// Re-export for convenience
pub use cast::CastFilter;
pub use crew::CrewFilter;
pub use genre::GenreFilter;
