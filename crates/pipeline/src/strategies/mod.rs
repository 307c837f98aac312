//! The three recommendation strategies.
//!
//! Each one is a pure function of the graph, the catalog and its request.

pub mod genre_match;
pub mod liked_history;
pub mod preference;

pub use genre_match::strict_genre_match;
pub use liked_history::liked_history;
pub use preference::preference_ranking;

/// Genres of a movie as stored on its graph node (empty if not in the graph)
pub(crate) fn node_genres(graph: &movie_graph::MovieGraph, id: data_loader::MovieId) -> &[String] {
    graph.node(id).map(|n| n.genres.as_slice()).unwrap_or(&[])
}
