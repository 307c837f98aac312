//! # Movie Graph Crate
//!
//! Builds and persists the genre co-occurrence graph: one node per movie,
//! an edge between every two movies that share at least one genre.
//!
//! ## Components
//!
//! ### Graph (`graph`)
//! `MovieGraph`: a simple undirected graph keyed by `MovieId`, each node
//! carrying its title and genre list.
//!
//! ### Builder (`builder`)
//! Walks the catalog once, linking each movie to every earlier movie of each
//! of its genres through a per-build `GenreAccumulator`. `matches_catalog`
//! tells whether a saved graph still belongs to a catalog.
//!
//! ### Node-link (`node_link`)
//! The `{"nodes": [...], "links": [...]}` JSON file the graph is saved to and
//! loaded from.
//!
//! ## Example Usage
//!
//! ```ignore
//! use movie_graph::{build_from_catalog, load_graph, save_graph};
//!
//! let graph = build_from_catalog(&catalog)?;
//! save_graph(&graph, Path::new("movie_graph.json"))?;
//!
//! let reloaded = load_graph(Path::new("movie_graph.json"))?;
//! assert_eq!(reloaded.edge_count(), graph.edge_count());
//! ```

// Public modules
pub mod error;
pub mod graph;
pub mod builder;
pub mod node_link;

// Re-export commonly used types
pub use error::{GraphError, Result};
pub use graph::{GraphStats, MovieGraph, MovieNode};
pub use builder::{build_from_catalog, build_graph, matches_catalog, GenreAccumulator, GraphRow};
pub use node_link::{
    from_json, from_node_link, load_graph, save_graph, to_json, to_node_link, LinkRecord,
    NodeLinkDocument, NodeRecord,
};
