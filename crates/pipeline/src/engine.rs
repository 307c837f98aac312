//! # Recommendation Engine
//!
//! Holds the run's graph and catalog behind `Arc`s and exposes the three
//! strategies with shared settings (top K, empty-match policy).
//!
//! Rust concept: every method takes `&self` and only reads, so one engine
//! can be cloned cheaply and used from several threads at once.

use crate::strategies::{liked_history, preference_ranking, strict_genre_match};
use crate::types::{EmptyMatchPolicy, Preferences, RankedCandidate, DEFAULT_TOP_K};
use data_loader::{Catalog, MovieId};
use movie_graph::MovieGraph;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct RecommendationEngine {
    graph: Arc<MovieGraph>,
    catalog: Arc<Catalog>,
    top_k: usize,
    policy: EmptyMatchPolicy,
}

impl RecommendationEngine {
    pub fn new(graph: Arc<MovieGraph>, catalog: Arc<Catalog>) -> Self {
        Self {
            graph,
            catalog,
            top_k: DEFAULT_TOP_K,
            policy: EmptyMatchPolicy::default(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_empty_match_policy(mut self, policy: EmptyMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn graph(&self) -> &MovieGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Strategy (a): movies carrying every requested genre, in graph order
    #[instrument(skip(self))]
    pub fn by_genres(&self, genres: &[String]) -> Vec<RankedCandidate> {
        strict_genre_match(&self.graph, &self.catalog, genres, self.top_k)
    }

    /// Strategy (b): rank by genre overlap with liked movies
    #[instrument(skip(self))]
    pub fn by_liked(&self, liked: &[MovieId]) -> Vec<RankedCandidate> {
        liked_history(&self.graph, &self.catalog, liked, self.top_k)
    }

    /// Strategy (c): filter by preferences, rank survivors by mutual overlap
    #[instrument(skip(self))]
    pub fn by_preferences(&self, preferences: &Preferences) -> Vec<RankedCandidate> {
        preference_ranking(&self.graph, &self.catalog, preferences, self.policy, self.top_k)
    }
}
