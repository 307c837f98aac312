//! Graph construction from the catalog.
//!
//! ## Algorithm
//! 1. Add one node per row: id -> {title, genres}
//! 2. Walk the rows again in order, keeping a per-genre list of ids seen so far
//! 3. For each genre of the current row, connect it to every id already in that
//!    genre's list, then append the current id
//!
//! Step 3 is quadratic in the number of movies per genre. With the default
//! cutoff (~1000 movies, ~20 genres) that is a few hundred thousand edge
//! inserts; it is the hot loop if the catalog grows.

use crate::error::Result;
use crate::graph::{MovieGraph, MovieNode};
use data_loader::{Catalog, MovieId, MovieRecord};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// One row of input to the builder
#[derive(Debug, Clone, Copy)]
pub struct GraphRow<'a> {
    pub id: MovieId,
    pub title: &'a str,
    pub genres: &'a [String],
}

impl<'a> From<&'a MovieRecord> for GraphRow<'a> {
    /// Nodes are labelled with the original-language title
    fn from(record: &'a MovieRecord) -> Self {
        Self {
            id: record.id,
            title: &record.original_title,
            genres: &record.genres,
        }
    }
}

/// Ids seen so far for each genre, scoped to a single build
#[derive(Debug, Default)]
pub struct GenreAccumulator<'a> {
    seen: HashMap<&'a str, Vec<MovieId>>,
}

impl<'a> GenreAccumulator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `id` to every earlier movie of each of its genres, then record it.
    ///
    /// Returns the number of edges that were actually new.
    pub fn link(&mut self, graph: &mut MovieGraph, id: MovieId, genres: &'a [String]) -> Result<usize> {
        let mut added = 0;
        for genre in genres {
            let earlier = self.seen.entry(genre.as_str()).or_default();
            for &other in earlier.iter() {
                if graph.add_edge(id, other)? {
                    added += 1;
                }
            }
            earlier.push(id);
        }
        Ok(added)
    }

    /// Number of distinct genres seen
    pub fn genre_count(&self) -> usize {
        self.seen.len()
    }

    /// The genre with the most member rows, i.e. the most expensive one to link
    pub fn largest_genre(&self) -> Option<(&'a str, usize)> {
        self.seen
            .iter()
            .map(|(genre, ids)| (*genre, ids.len()))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    }
}

/// Build the graph from rows in dataset order
pub fn build_graph<'a, I>(rows: I) -> Result<MovieGraph>
where
    I: IntoIterator<Item = GraphRow<'a>>,
{
    let rows: Vec<GraphRow<'a>> = rows.into_iter().collect();
    let mut graph = MovieGraph::new();

    for row in &rows {
        graph.add_node(
            row.id,
            MovieNode {
                title: row.title.to_string(),
                genres: row.genres.to_vec(),
            },
        );
    }

    let mut accumulator = GenreAccumulator::new();
    for row in &rows {
        accumulator.link(&mut graph, row.id, row.genres)?;
    }

    if let Some((genre, size)) = accumulator.largest_genre() {
        debug!("Largest genre: {} ({} movies)", genre, size);
    }
    debug!("Linked {} distinct genres", accumulator.genre_count());
    Ok(graph)
}

/// Build the graph for a finalized catalog
#[instrument(skip(catalog), fields(movies = catalog.len()))]
pub fn build_from_catalog(catalog: &Catalog) -> Result<MovieGraph> {
    let graph = build_graph(catalog.movies().iter().map(GraphRow::from))?;
    info!(
        "Built movie graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// True when `graph` is exactly what `build_from_catalog` would produce for
/// `catalog`: the same node ids with the same titles and genres.
///
/// Edges follow from the node genres, so they are not compared.
pub fn matches_catalog(graph: &MovieGraph, catalog: &Catalog) -> bool {
    let mut expected: HashMap<MovieId, GraphRow<'_>> = HashMap::with_capacity(catalog.len());
    for row in catalog.movies().iter().map(GraphRow::from) {
        expected.insert(row.id, row);
    }

    graph.node_count() == expected.len()
        && expected.values().all(|row| {
            graph
                .node(row.id)
                .is_some_and(|node| node.title == row.title && node.genres == row.genres)
        })
}
