//! The movie co-occurrence graph.
//!
//! Topology lives in a petgraph `UnGraphMap` keyed directly by `MovieId`;
//! node attributes live in a side table. `UnGraphMap` keeps nodes in
//! insertion order and never stores parallel edges, which gives us stable
//! iteration and idempotent edge insertion for free.

use crate::error::{GraphError, Result};
use data_loader::MovieId;
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attributes carried by every node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieNode {
    pub title: String,
    /// Genre names in source order, duplicates kept as-is
    pub genres: Vec<String>,
}

/// Undirected, simple graph of movies that share at least one genre
#[derive(Debug, Clone, Default)]
pub struct MovieGraph {
    topology: UnGraphMap<MovieId, ()>,
    attributes: HashMap<MovieId, MovieNode>,
}

impl MovieGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or replace the attributes of an existing one.
    ///
    /// Returns true if the id was new.
    pub fn add_node(&mut self, id: MovieId, node: MovieNode) -> bool {
        let is_new = !self.topology.contains_node(id);
        self.topology.add_node(id);
        self.attributes.insert(id, node);
        is_new
    }

    /// Connect two existing nodes.
    ///
    /// Returns `Ok(true)` when a new edge was stored, `Ok(false)` when the pair
    /// was already connected or `a == b` (the graph has no self-loops).
    pub fn add_edge(&mut self, a: MovieId, b: MovieId) -> Result<bool> {
        for id in [a, b] {
            if !self.topology.contains_node(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if a == b || self.topology.contains_edge(a, b) {
            return Ok(false);
        }
        self.topology.add_edge(a, b, ());
        Ok(true)
    }

    pub fn node(&self, id: MovieId) -> Option<&MovieNode> {
        self.attributes.get(&id)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.topology.contains_node(id)
    }

    pub fn has_edge(&self, a: MovieId, b: MovieId) -> bool {
        self.topology.contains_edge(a, b)
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    /// Nodes with their attributes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (MovieId, &MovieNode)> + '_ {
        self.topology
            .nodes()
            .filter_map(move |id| self.attributes.get(&id).map(|node| (id, node)))
    }

    /// Every edge exactly once, as an unordered pair
    pub fn edges(&self) -> impl Iterator<Item = (MovieId, MovieId)> + '_ {
        self.topology.all_edges().map(|(a, b, _)| (a, b))
    }

    pub fn neighbors(&self, id: MovieId) -> impl Iterator<Item = MovieId> + '_ {
        self.topology.neighbors(id)
    }

    pub fn degree(&self, id: MovieId) -> usize {
        self.neighbors(id).count()
    }
}

/// Summary numbers for a loaded graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// edges / possible edges, 0.0 for graphs with fewer than two nodes
    pub density: f64,
    pub isolated_nodes: usize,
}

impl GraphStats {
    pub fn of(graph: &MovieGraph) -> Self {
        let nodes = graph.node_count();
        let edges = graph.edge_count();
        let density = if nodes < 2 {
            0.0
        } else {
            edges as f64 / ((nodes * (nodes - 1)) as f64 / 2.0)
        };
        let isolated_nodes = graph
            .nodes()
            .filter(|(id, _)| graph.degree(*id) == 0)
            .count();
        Self {
            nodes,
            edges,
            density,
            isolated_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(title: &str, genres: &[&str]) -> MovieNode {
        MovieNode {
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_add_edge_is_idempotent() {
        let mut graph = MovieGraph::new();
        graph.add_node(1, node("One", &["A"]));
        graph.add_node(2, node("Two", &["A"]));

        assert!(graph.add_edge(1, 2).unwrap());
        assert!(!graph.add_edge(1, 2).unwrap());
        assert!(!graph.add_edge(2, 1).unwrap());
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(2, 1));
    }

    #[test]
    fn test_self_loop_is_ignored() {
        let mut graph = MovieGraph::new();
        graph.add_node(1, node("One", &["A"]));
        assert!(!graph.add_edge(1, 1).unwrap());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_edge_to_unknown_node_fails() {
        let mut graph = MovieGraph::new();
        graph.add_node(1, node("One", &["A"]));
        assert!(matches!(graph.add_edge(1, 9), Err(GraphError::UnknownNode(9))));
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut graph = MovieGraph::new();
        for id in [30, 10, 20] {
            graph.add_node(id, node("x", &[]));
        }
        let ids: Vec<MovieId> = graph.nodes().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_stats() {
        let mut graph = MovieGraph::new();
        graph.add_node(1, node("One", &["A"]));
        graph.add_node(2, node("Two", &["A"]));
        graph.add_node(3, node("Three", &["B"]));
        graph.add_edge(1, 2).unwrap();

        let stats = GraphStats::of(&graph);
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.isolated_nodes, 1);
        assert!((stats.density - 1.0 / 3.0).abs() < 1e-9);

        assert_eq!(GraphStats::of(&MovieGraph::new()).density, 0.0);
    }
}
