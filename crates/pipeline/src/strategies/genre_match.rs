//! Strict genre match.
//!
//! A movie qualifies when its genre list contains every requested genre.
//! Results come out in graph node order with no further sorting, so the
//! first `top_k` qualifying nodes win.

use crate::scoring::genre_overlap;
use crate::types::RankedCandidate;
use data_loader::Catalog;
use movie_graph::MovieGraph;
use std::collections::HashSet;
use tracing::debug;

/// Up to `top_k` movies carrying all of `requested`.
///
/// An empty request matches every node. Titles are the graph node titles.
pub fn strict_genre_match(
    graph: &MovieGraph,
    catalog: &Catalog,
    requested: &[String],
    top_k: usize,
) -> Vec<RankedCandidate> {
    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let matches: Vec<RankedCandidate> = graph
        .nodes()
        .filter(|(_, node)| wanted.iter().all(|g| node.genres.iter().any(|have| have == g)))
        .take(top_k)
        .map(|(id, node)| {
            let enrichment = catalog.get_movie(id).map(|m| &m.enrichment);
            RankedCandidate {
                movie_id: id,
                title: node.title.clone(),
                genre_overlap: genre_overlap(&node.genres, requested),
                vote_average: enrichment.and_then(|e| e.vote_average),
                popularity: enrichment.and_then(|e| e.popularity),
            }
        })
        .collect();

    debug!("Strict genre match for {:?}: {} results", requested, matches.len());
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::{ids, rated, session};

    fn request(genres: &[&str]) -> Vec<String> {
        genres.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_scenario() {
        let (graph, catalog) = session(vec![
            rated(1, &["A", "B"], None, None),
            rated(2, &["B", "C"], None, None),
            rated(3, &["D"], None, None),
        ]);
        let result = strict_genre_match(&graph, &catalog, &request(&["B"]), 5);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_requires_every_genre() {
        let (graph, catalog) = session(vec![
            rated(1, &["A", "B"], None, None),
            rated(2, &["B", "C"], None, None),
        ]);
        let result = strict_genre_match(&graph, &catalog, &request(&["B", "C"]), 5);
        assert_eq!(ids(&result), vec![2]);
        for candidate in &result {
            let node = graph.node(candidate.movie_id).unwrap();
            assert!(node.genres.contains(&"C".to_string()));
        }
    }

    #[test]
    fn test_empty_request_matches_all_in_node_order() {
        let (graph, catalog) = session(vec![
            rated(9, &["A"], None, None),
            rated(4, &[], None, None),
            rated(7, &["B"], None, None),
        ]);
        let result = strict_genre_match(&graph, &catalog, &[], 5);
        assert_eq!(ids(&result), vec![9, 4, 7]);
    }

    #[test]
    fn test_no_secondary_sort_and_truncation() {
        let (graph, catalog) = session(vec![
            rated(1, &["A"], Some(1.0), None),
            rated(2, &["A"], Some(9.0), None),
            rated(3, &["A"], Some(5.0), None),
        ]);
        let result = strict_genre_match(&graph, &catalog, &request(&["A"]), 2);
        assert_eq!(ids(&result), vec![1, 2]);
        assert_eq!(result[1].vote_average, Some(9.0));
    }

    #[test]
    fn test_overlap_counts_distinct_shared_genres() {
        let (graph, catalog) = session(vec![
            rated(1, &["A", "B", "C"], None, None),
            rated(2, &["B"], None, None),
        ]);

        let result = strict_genre_match(&graph, &catalog, &request(&["B", "A", "B"]), 5);
        assert_eq!(ids(&result), vec![1]);
        assert_eq!(result[0].genre_overlap, 2);

        let everything = strict_genre_match(&graph, &catalog, &[], 5);
        assert!(everything.iter().all(|c| c.genre_overlap == 0));
    }
}
