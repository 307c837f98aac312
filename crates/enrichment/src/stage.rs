//! # Enrichment Stage
//!
//! Resolves the enrichment attributes of a list of movie ids, consulting the
//! cache first and the remote source only for ids it has never seen.
//!
//! ## Algorithm
//! 1. Drop ids that are already cached or known misses (unless `retry_misses`)
//! 2. Spawn one task per remaining id into a `JoinSet`; each task waits for a
//!    semaphore permit before calling the source, so at most `concurrency`
//!    requests are in flight
//! 3. Collect results in this function as they finish. This loop is the only
//!    writer of the cache, and each new entry is persisted before the next
//!    result is applied
//! 4. Flush the cache once more at the end
//!
//! Rust concept: the tasks own an `Arc` of the source and of the semaphore,
//! while the cache stays borrowed by the collecting loop. Nothing mutable is
//! shared between tasks, so no `Mutex` is needed.

use crate::cache::AttributeCache;
use crate::error::Result;
use crate::source::{EnrichmentSource, Lookup};
use data_loader::MovieId;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Default number of simultaneous requests
pub const DEFAULT_CONCURRENCY: usize = 8;

/// What one run of the stage did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Distinct ids asked for
    pub requested: usize,
    /// Already in the cache
    pub cached: usize,
    /// Skipped because an earlier run recorded them as misses
    pub skipped_misses: usize,
    /// Newly fetched and written to the cache
    pub fetched: usize,
    /// The source answered "no data"
    pub unavailable: usize,
    /// Transport failures, timeouts and panicked tasks
    pub failed: usize,
}

/// Bounded-concurrency cache filler
pub struct EnrichmentStage {
    source: Arc<dyn EnrichmentSource>,
    concurrency: usize,
    retry_misses: bool,
}

impl EnrichmentStage {
    pub fn new(source: Arc<dyn EnrichmentSource>) -> Self {
        Self {
            source,
            concurrency: DEFAULT_CONCURRENCY,
            retry_misses: false,
        }
    }

    /// Maximum requests in flight (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Ask again for ids recorded as misses by earlier runs
    pub fn with_retry_misses(mut self, retry_misses: bool) -> Self {
        self.retry_misses = retry_misses;
        self
    }

    /// Fill `cache` with entries for `ids`.
    ///
    /// Only cache I/O errors abort the run; lookup failures are counted and
    /// the movie stays unenriched.
    #[instrument(skip(self, cache, ids), fields(source = self.source.name(), ids = ids.len()))]
    pub async fn run(&self, cache: &mut AttributeCache, ids: &[MovieId]) -> Result<EnrichmentReport> {
        let start = Instant::now();
        let mut report = EnrichmentReport::default();

        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            report.requested += 1;
            if cache.contains(id) {
                report.cached += 1;
            } else if !self.retry_misses && cache.is_known_miss(id) {
                report.skipped_misses += 1;
            } else {
                pending.push(id);
            }
        }
        info!(
            "{} ids to fetch ({} cached, {} known misses)",
            pending.len(),
            report.cached,
            report.skipped_misses
        );

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        for id in pending {
            let source = Arc::clone(&self.source);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                (id, source.fetch(id).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(Lookup::Found(entry)))) => {
                    if cache.insert_if_absent(id, entry)? {
                        report.fetched += 1;
                    }
                }
                Ok((id, Ok(Lookup::Unavailable { status }))) => {
                    debug!("No data for movie {} (status {})", id, status);
                    cache.record_miss(id)?;
                    report.unavailable += 1;
                }
                Ok((id, Err(e))) => {
                    warn!("Lookup for movie {} failed: {}", id, e);
                    report.failed += 1;
                }
                Err(e) => {
                    warn!("Enrichment task failed: {}", e);
                    report.failed += 1;
                }
            }
        }

        cache.flush()?;
        info!(
            "Enrichment finished in {:?}: {} fetched, {} unavailable, {} failed",
            start.elapsed(),
            report.fetched,
            report.unavailable,
            report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use crate::error::EnrichmentError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source: ids in `found` resolve, ids in `failing` error out,
    /// everything else is a 404
    #[derive(Default)]
    struct MockSource {
        found: HashMap<MovieId, f64>,
        failing: HashSet<MovieId>,
        calls: Mutex<Vec<MovieId>>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl MockSource {
        fn calls(&self) -> Vec<MovieId> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort_unstable();
            calls
        }
    }

    #[async_trait]
    impl EnrichmentSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch(&self, movie_id: MovieId) -> Result<Lookup> {
            self.calls.lock().unwrap().push(movie_id);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&movie_id) {
                // Any transport-level error will do
                let err = serde_json::from_str::<u32>("x").unwrap_err();
                return Err(EnrichmentError::Encode(err));
            }
            Ok(match self.found.get(&movie_id) {
                Some(&vote_average) => Lookup::Found(CacheEntry {
                    vote_average: Some(vote_average),
                    ..CacheEntry::default()
                }),
                None => Lookup::Unavailable { status: 404 },
            })
        }
    }

    fn source(found: &[(MovieId, f64)], failing: &[MovieId]) -> Arc<MockSource> {
        Arc::new(MockSource {
            found: found.iter().copied().collect(),
            failing: failing.iter().copied().collect(),
            ..MockSource::default()
        })
    }

    #[tokio::test]
    async fn test_fetches_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = AttributeCache::load(&path).unwrap();

        let mock = source(&[(1, 7.0), (2, 6.0)], &[]);
        let stage = EnrichmentStage::new(mock.clone());
        let report = stage.run(&mut cache, &[1, 2]).await.unwrap();

        assert_eq!(report.fetched, 2);
        let reloaded = AttributeCache::load(&path).unwrap();
        assert_eq!(reloaded.get(2).unwrap().vote_average, Some(6.0));
    }

    #[tokio::test]
    async fn test_cached_ids_are_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AttributeCache::load(dir.path().join("cache.json")).unwrap();
        cache
            .put(1, CacheEntry { vote_average: Some(9.9), ..CacheEntry::default() })
            .unwrap();

        let mock = source(&[(1, 1.0), (2, 2.0)], &[]);
        let report = EnrichmentStage::new(mock.clone())
            .run(&mut cache, &[1, 2, 2])
            .await
            .unwrap();

        assert_eq!(mock.calls(), vec![2]);
        assert_eq!(report.requested, 2);
        assert_eq!(report.cached, 1);
        // Existing entry untouched
        assert_eq!(cache.get(1).unwrap().vote_average, Some(9.9));
    }

    #[tokio::test]
    async fn test_failures_stay_absent_and_are_not_misses() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AttributeCache::load(dir.path().join("cache.json")).unwrap();

        let mock = source(&[(1, 5.0)], &[3]);
        let report = EnrichmentStage::new(mock)
            .run(&mut cache, &[1, 3])
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert!(!cache.contains(3));
        assert!(!cache.is_known_miss(3));
    }

    #[tokio::test]
    async fn test_misses_are_skipped_next_run_unless_retrying() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = AttributeCache::load(&path).unwrap();
        let report = EnrichmentStage::new(source(&[], &[]))
            .run(&mut cache, &[404])
            .await
            .unwrap();
        assert_eq!(report.unavailable, 1);

        let mut cache = AttributeCache::load(&path).unwrap();
        let second = source(&[], &[]);
        let report = EnrichmentStage::new(second.clone())
            .run(&mut cache, &[404])
            .await
            .unwrap();
        assert_eq!(report.skipped_misses, 1);
        assert!(second.calls().is_empty());

        let retry = source(&[(404, 4.0)], &[]);
        let report = EnrichmentStage::new(retry.clone())
            .with_retry_misses(true)
            .run(&mut cache, &[404])
            .await
            .unwrap();
        assert_eq!(retry.calls(), vec![404]);
        assert_eq!(report.fetched, 1);
        assert!(!cache.is_known_miss(404));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AttributeCache::load(dir.path().join("cache.json")).unwrap();

        let found: Vec<(MovieId, f64)> = (1..=20).map(|id| (id, 5.0)).collect();
        let mock = source(&found, &[]);
        let ids: Vec<MovieId> = (1..=20).collect();
        let report = EnrichmentStage::new(mock.clone())
            .with_concurrency(3)
            .run(&mut cache, &ids)
            .await
            .unwrap();

        assert_eq!(report.fetched, 20);
        assert!(mock.peak_in_flight.load(Ordering::SeqCst) <= 3);
    }
}
