//! # Build Orchestrator
//!
//! This module runs the batch pipeline end to end:
//! 1. Load and clean the two TMDb tables
//! 2. Load the attribute cache
//! 3. Enrich the first N movies from TMDb (only with an API key)
//! 4. Merge cached attributes into every cleaned row, then cut the working
//!    `Catalog` down to the first N
//! 5. Build the genre graph and persist it as node-link JSON
//!
//! `load_session` is the offline counterpart used by the query commands: it
//! never touches the network and reuses the persisted graph when it still
//! matches the working catalog. A missing or stale graph file is rebuilt.
//!
//! ## Learning Goals
//! - Using spawn_blocking for CPU-bound work inside an async run
//! - Adding context to errors that cross crate boundaries
//! - Timing each stage with `Instant`

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};

use data_loader::{Catalog, CleanedDataset};
use enrichment::{AttributeCache, EnrichmentReport, EnrichmentStage, TmdbClient};
use movie_graph::{
    build_from_catalog, load_graph, matches_catalog, save_graph, GraphStats, MovieGraph,
};
use pipeline::RecommendationEngine;

use crate::config::RunConfig;
use crate::recommend::RecommendationService;

/// Catalogs and graph for one run, shared read-only
#[derive(Debug, Clone)]
pub struct Session {
    /// The first N merged rows; the graph's node set and the strategies' input
    pub catalog: Arc<Catalog>,
    /// Every cleaned and merged row; title lookups, genre validation, details
    pub full_catalog: Arc<Catalog>,
    pub graph: Arc<MovieGraph>,
}

impl Session {
    /// Recommendation service over this session with the run's settings
    pub fn service(&self, config: &RunConfig) -> RecommendationService {
        let engine = RecommendationEngine::new(self.graph.clone(), self.catalog.clone())
            .with_top_k(config.top_k)
            .with_empty_match_policy(config.empty_match_policy);
        RecommendationService::new(engine, self.full_catalog.clone())
    }
}

/// Everything a `build` run produced
#[derive(Debug)]
pub struct BuildOutput {
    pub session: Session,
    pub stats: GraphStats,
    /// Rows left after cleaning, before the cutoff
    pub cleaned_rows: usize,
    /// `None` when enrichment was skipped
    pub enrichment: Option<EnrichmentReport>,
    pub elapsed: Duration,
}

pub struct BuildOrchestrator {
    config: RunConfig,
}

impl BuildOrchestrator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Full build: tables, enrichment, catalog, graph, graph file
    pub async fn run(&self) -> Result<BuildOutput> {
        let start_time = Instant::now();

        let cleaned = self.load_tables().await?;
        let cleaned_rows = cleaned.len();

        let mut cache = AttributeCache::load(&self.config.cache_path)
            .with_context(|| format!("Failed to load cache {}", self.config.cache_path.display()))?;

        let enrichment = match self.config.enrichment.api_key() {
            Some(api_key) => {
                let stage_start = Instant::now();
                let targets = cleaned.enrichment_targets(self.config.cutoff);
                let client = TmdbClient::new(
                    api_key,
                    self.config.enrichment.base_url.as_str(),
                    self.config.enrichment.timeout,
                )
                .context("Failed to create TMDb client")?;
                let report = EnrichmentStage::new(Arc::new(client))
                    .with_concurrency(self.config.enrichment.concurrency)
                    .with_retry_misses(self.config.enrichment.retry_misses)
                    .run(&mut cache, &targets)
                    .await
                    .context("Enrichment stage failed")?;
                info!("Enrichment took {:?}", stage_start.elapsed());
                Some(report)
            }
            None => {
                warn!("No TMDb API key configured, using cached attributes only");
                None
            }
        };

        let (full_catalog, catalog) = finalize(cleaned, &cache, self.config.cutoff);

        let graph_start = Instant::now();
        let graph = build_from_catalog(&catalog).context("Failed to build movie graph")?;
        info!("Graph construction took {:?}", graph_start.elapsed());

        save_graph(&graph, &self.config.graph_path)
            .with_context(|| format!("Failed to save graph to {}", self.config.graph_path.display()))?;

        let stats = GraphStats::of(&graph);
        let elapsed = start_time.elapsed();
        info!("Build finished in {:?}", elapsed);

        Ok(BuildOutput {
            session: Session {
                catalog: Arc::new(catalog),
                full_catalog: Arc::new(full_catalog),
                graph: Arc::new(graph),
            },
            stats,
            cleaned_rows,
            enrichment,
            elapsed,
        })
    }

    /// Offline session: catalogs from tables + cache, graph from its file.
    ///
    /// The graph is rebuilt from the catalog and written out when the file
    /// does not exist or no longer matches the catalog, e.g. after a
    /// different cutoff or edited tables.
    pub fn load_session(&self) -> Result<Session> {
        let cleaned = CleanedDataset::load_from_files(&self.config.movies_path, &self.config.credits_path)
            .context("Failed to load movie tables")?;
        let cache = AttributeCache::load(&self.config.cache_path)
            .with_context(|| format!("Failed to load cache {}", self.config.cache_path.display()))?;
        let (full_catalog, catalog) = finalize(cleaned, &cache, self.config.cutoff);

        let graph_path = &self.config.graph_path;
        let saved = if graph_path.exists() {
            let graph = load_graph(graph_path)
                .with_context(|| format!("Failed to load graph {}", graph_path.display()))?;
            if matches_catalog(&graph, &catalog) {
                Some(graph)
            } else {
                warn!(
                    "Graph file {} ({} nodes) does not match the {} catalog movies, rebuilding",
                    graph_path.display(),
                    graph.node_count(),
                    catalog.len()
                );
                None
            }
        } else {
            warn!("Graph file {} not found, rebuilding", graph_path.display());
            None
        };

        let graph = match saved {
            Some(graph) => graph,
            None => {
                let graph = build_from_catalog(&catalog).context("Failed to build movie graph")?;
                save_graph(&graph, graph_path)
                    .with_context(|| format!("Failed to save graph to {}", graph_path.display()))?;
                graph
            }
        };

        Ok(Session {
            catalog: Arc::new(catalog),
            full_catalog: Arc::new(full_catalog),
            graph: Arc::new(graph),
        })
    }

    /// CSV parsing and JSON decoding are CPU-bound, so they run off the
    /// async worker threads
    async fn load_tables(&self) -> Result<CleanedDataset> {
        let movies_path = self.config.movies_path.clone();
        let credits_path = self.config.credits_path.clone();
        let start = Instant::now();

        let cleaned = tokio::task::spawn_blocking(move || {
            CleanedDataset::load_from_files(&movies_path, &credits_path)
        })
        .await
        .context("Table loading task panicked")?
        .context("Failed to load movie tables")?;

        info!("Loaded {} cleaned rows in {:?}", cleaned.len(), start.elapsed());
        Ok(cleaned)
    }
}

/// Merge cached attributes, then apply the cutoff: (full, working)
fn finalize(cleaned: CleanedDataset, cache: &AttributeCache, cutoff: usize) -> (Catalog, Catalog) {
    let lookup = cache.lookup_table();
    let full = cleaned.merge(|id| lookup.get(&id).cloned());
    let working = full.head(cutoff);
    info!("Working catalog: first {} of {} movies", working.len(), full.len());
    (full, working)
}
