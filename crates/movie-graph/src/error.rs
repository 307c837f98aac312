//! Error types for graph construction and node-link persistence.

use data_loader::MovieId;
use thiserror::Error;

/// Errors raised by `MovieGraph` mutation and by the node-link loader.
///
/// Every loader error is structural: we refuse to hand back a partial graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// An edge or link referenced an id that is not a node
    #[error("Link references unknown node {0}")]
    UnknownNode(MovieId),

    /// The same node id appeared twice in a node-link document
    #[error("Duplicate node {0} in node-link document")]
    DuplicateNode(MovieId),

    /// A link connected a node to itself
    #[error("Self-loop on node {0} in node-link document")]
    SelfLoop(MovieId),

    /// The document was not valid node-link JSON (including missing `nodes`/`links`)
    #[error("Malformed node-link document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// I/O error while reading or writing a graph file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, GraphError>;
