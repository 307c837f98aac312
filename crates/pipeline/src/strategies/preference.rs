//! Multi-attribute filter plus overlap ranking.
//!
//! ## Algorithm
//! 1. Turn each supplied preference into a filter (genre, cast, crew)
//! 2. Intersect their subsets of the catalog under the empty-match policy
//! 3. Score each survivor by the sum of its genre overlap with every other
//!    survivor
//! 4. Rank by the composite order and keep the top K

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{CastFilter, CrewFilter, GenreFilter};
use crate::scoring::{genre_overlap, rank_by_composite};
use crate::strategies::node_genres;
use crate::types::{EmptyMatchPolicy, Preferences, RankedCandidate};
use data_loader::Catalog;
use movie_graph::MovieGraph;
use rayon::prelude::*;
use tracing::debug;

/// Build the filter pipeline for a set of preferences
pub fn preference_pipeline(preferences: &Preferences, policy: EmptyMatchPolicy) -> FilterPipeline {
    let mut pipeline = FilterPipeline::new().with_policy(policy);
    if let Some(genre) = preferences.genre() {
        pipeline = pipeline.add_filter(GenreFilter::new(genre));
    }
    if let Some(name) = preferences.cast_name() {
        pipeline = pipeline.add_filter(CastFilter::new(name));
    }
    if let Some(name) = preferences.crew_name() {
        pipeline = pipeline.add_filter(CrewFilter::new(name));
    }
    pipeline
}

pub fn preference_ranking(
    graph: &MovieGraph,
    catalog: &Catalog,
    preferences: &Preferences,
    policy: EmptyMatchPolicy,
    top_k: usize,
) -> Vec<RankedCandidate> {
    let survivors = preference_pipeline(preferences, policy).apply(catalog.movies());
    debug!("{} movies survive the preference filters", survivors.len());

    let survivor_genres: Vec<&[String]> = survivors.iter().map(|m| node_genres(graph, m.id)).collect();

    let scored: Vec<RankedCandidate> = survivors
        .par_iter()
        .enumerate()
        .map(|(i, movie)| {
            let score = survivor_genres
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| genre_overlap(survivor_genres[i], other))
                .sum();
            RankedCandidate::from_record(movie, score)
        })
        .collect();

    rank_by_composite(scored, top_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::movie;
    use crate::strategies::test_support::{ids, session};

    fn cast_catalog() -> Vec<data_loader::MovieRecord> {
        vec![
            movie(1, &["Action", "Sci-Fi"], &["Ann"], &["Jim"]),
            movie(2, &["Action"], &["Ann"], &["Kim"]),
            movie(3, &["Drama"], &["Bob"], &["Jim"]),
            movie(4, &["Action", "Sci-Fi"], &["Bob"], &["Jim"]),
        ]
    }

    #[test]
    fn test_survivors_scored_against_each_other() {
        let (graph, catalog) = session(cast_catalog());
        let prefs = Preferences::new().with_genre("Action");
        let result = preference_ranking(&graph, &catalog, &prefs, EmptyMatchPolicy::Exclude, 5);

        // 1 and 4 share two genres, each shares Action with 2
        assert_eq!(ids(&result), vec![1, 4, 2]);
        assert_eq!(result[0].genre_overlap, 3);
        assert_eq!(result[2].genre_overlap, 2);
    }

    #[test]
    fn test_filters_intersect() {
        let (graph, catalog) = session(cast_catalog());
        let prefs = Preferences::new().with_genre("Action").with_crew_name("Jim");
        let result = preference_ranking(&graph, &catalog, &prefs, EmptyMatchPolicy::Exclude, 5);
        assert_eq!(ids(&result), vec![1, 4]);
    }

    #[test]
    fn test_unmatched_preference_under_each_policy() {
        let (graph, catalog) = session(cast_catalog());
        let prefs = Preferences::new().with_cast_name("Ann").with_crew_name("Nobody");

        let excluded = preference_ranking(&graph, &catalog, &prefs, EmptyMatchPolicy::Exclude, 5);
        assert!(excluded.is_empty());

        let ignored = preference_ranking(&graph, &catalog, &prefs, EmptyMatchPolicy::Ignore, 5);
        assert_eq!(ids(&ignored), vec![1, 2]);
    }

    #[test]
    fn test_no_preferences_ranks_whole_catalog() {
        let (graph, catalog) = session(cast_catalog());
        let result = preference_ranking(&graph, &catalog, &Preferences::new(), EmptyMatchPolicy::Exclude, 2);
        assert_eq!(result.len(), 2);
        // 1 and 4 each overlap 2 + 1 + 0 = 3
        assert_eq!(ids(&result), vec![1, 4]);
    }

    #[test]
    fn test_single_survivor_scores_zero() {
        let (graph, catalog) = session(cast_catalog());
        let prefs = Preferences::new().with_crew_name("Kim");
        let result = preference_ranking(&graph, &catalog, &prefs, EmptyMatchPolicy::Exclude, 5);
        assert_eq!(ids(&result), vec![2]);
        assert_eq!(result[0].genre_overlap, 0);
    }
}
