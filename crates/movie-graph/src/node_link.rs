//! Node-link persistence for `MovieGraph`.
//!
//! The file format is the only durable contract for the graph:
//!
//! ```json
//! {"nodes": [{"id": 19995, "title": "Avatar", "genres": ["Action", "Adventure"]}],
//!  "links": [{"source": 19995, "target": 285}]}
//! ```
//!
//! Other top-level keys (`directed`, `multigraph`, `graph`, as written by
//! other node-link producers) are accepted and ignored.

use crate::error::{GraphError, Result};
use crate::graph::{MovieGraph, MovieNode};
use data_loader::MovieId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// One entry of the `nodes` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
}

/// One entry of the `links` list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub source: MovieId,
    pub target: MovieId,
}

/// The whole serialized graph
///
/// Neither list has a serde default: a document missing either key fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
}

/// Convert a graph to its node-link form (nodes in insertion order)
pub fn to_node_link(graph: &MovieGraph) -> NodeLinkDocument {
    let nodes = graph
        .nodes()
        .map(|(id, node)| NodeRecord {
            id,
            title: node.title.clone(),
            genres: node.genres.clone(),
        })
        .collect();
    let links = graph
        .edges()
        .map(|(source, target)| LinkRecord { source, target })
        .collect();
    NodeLinkDocument { nodes, links }
}

/// Rebuild a graph from its node-link form.
///
/// Fails on duplicate node ids, on links to unknown nodes and on self-loops.
/// A link listed twice (in either direction) collapses into one edge.
pub fn from_node_link(document: NodeLinkDocument) -> Result<MovieGraph> {
    let mut graph = MovieGraph::new();

    for record in document.nodes {
        let is_new = graph.add_node(
            record.id,
            MovieNode {
                title: record.title,
                genres: record.genres,
            },
        );
        if !is_new {
            return Err(GraphError::DuplicateNode(record.id));
        }
    }

    for link in document.links {
        if link.source == link.target {
            return Err(GraphError::SelfLoop(link.source));
        }
        graph.add_edge(link.source, link.target)?;
    }

    Ok(graph)
}

/// Serialize a graph to a JSON string
pub fn to_json(graph: &MovieGraph) -> Result<String> {
    Ok(serde_json::to_string(&to_node_link(graph))?)
}

/// Parse a graph from a JSON string
pub fn from_json(json: &str) -> Result<MovieGraph> {
    let document: NodeLinkDocument = serde_json::from_str(json)?;
    from_node_link(document)
}

/// Write a graph to `path` as node-link JSON
pub fn save_graph(graph: &MovieGraph, path: &Path) -> Result<()> {
    let json = to_json(graph)?;
    fs::write(path, json).map_err(|source| GraphError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(
        "Saved graph ({} nodes, {} edges) to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}

/// Load a graph previously written by `save_graph`
pub fn load_graph(path: &Path) -> Result<MovieGraph> {
    let json = fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let graph = from_json(&json)?;
    info!(
        "Loaded graph ({} nodes, {} edges) from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}
