//! Liked-history overlap ranking.
//!
//! ## Algorithm
//! 1. Look up the genre list of every liked movie on the graph
//! 2. Score each other catalog movie by the sum, over liked movies, of the
//!    number of genres they share
//! 3. Rank by the composite order and keep the top K
//!
//! Step 2 runs on the rayon pool; `collect` keeps catalog order, which the
//! stable sort in step 3 relies on for ties.

use crate::scoring::{genre_overlap, rank_by_composite};
use crate::strategies::node_genres;
use crate::types::RankedCandidate;
use data_loader::{Catalog, MovieId};
use movie_graph::MovieGraph;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::debug;

pub fn liked_history(
    graph: &MovieGraph,
    catalog: &Catalog,
    liked: &[MovieId],
    top_k: usize,
) -> Vec<RankedCandidate> {
    let liked_ids: HashSet<MovieId> = liked.iter().copied().collect();
    let liked_genres: Vec<&[String]> = liked_ids
        .iter()
        .filter(|id| graph.contains(**id))
        .map(|&id| node_genres(graph, id))
        .collect();

    let scored: Vec<RankedCandidate> = catalog
        .movies()
        .par_iter()
        .filter(|movie| !liked_ids.contains(&movie.id))
        .map(|movie| {
            let genres = node_genres(graph, movie.id);
            let score = liked_genres
                .iter()
                .map(|liked| genre_overlap(genres, liked))
                .sum();
            RankedCandidate::from_record(movie, score)
        })
        .collect();

    debug!(
        "Scored {} candidates against {} liked movies",
        scored.len(),
        liked_genres.len()
    );
    rank_by_composite(scored, top_k)
}
