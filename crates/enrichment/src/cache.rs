//! File-backed attribute cache.
//!
//! The cache file is one JSON object keyed by the stringified movie id:
//!
//! ```json
//! {"19995": {"popularity": 150.4, "revenue": 2787965087, "tagline": "Enter the World of Pandora.",
//!            "vote_average": 7.2, "vote_count": 11800}}
//! ```
//!
//! Next to it lives a miss sidecar (`<stem>.misses.json`, a JSON array of ids)
//! listing movies the API had no data for, so later runs don't ask again.
//!
//! Every write rewrites the whole file. There is no locking: two processes
//! sharing a cache file can lose each other's updates.

use crate::error::{EnrichmentError, Result};
use data_loader::{Enrichment, MovieId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One cache value: the five enrichment attributes of a movie
pub type CacheEntry = Enrichment;

/// In-memory view of the cache file plus its miss sidecar
#[derive(Debug)]
pub struct AttributeCache {
    path: PathBuf,
    misses_path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
    misses: BTreeSet<MovieId>,
}

impl AttributeCache {
    /// Load the cache at `path`.
    ///
    /// A missing file (or missing sidecar) is an empty cache, never an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let misses_path = misses_path_for(&path);

        let entries: BTreeMap<String, CacheEntry> = read_json_or_default(&path)?;
        let misses: BTreeSet<MovieId> = read_json_or_default(&misses_path)?;

        info!(
            "Loaded attribute cache from {}: {} entries, {} known misses",
            path.display(),
            entries.len(),
            misses.len()
        );
        Ok(Self {
            path,
            misses_path,
            entries,
            misses,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: MovieId) -> Option<&CacheEntry> {
        self.entries.get(&id.to_string())
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.entries.contains_key(&id.to_string())
    }

    /// Insert or overwrite an entry, then rewrite the cache file
    pub fn put(&mut self, id: MovieId, entry: CacheEntry) -> Result<()> {
        self.entries.insert(id.to_string(), entry);
        if self.misses.remove(&id) {
            write_json(&self.misses_path, &self.misses)?;
        }
        self.flush()
    }

    /// Append-only insert used while enriching.
    ///
    /// Returns `Ok(false)` without touching the file if `id` is already cached.
    pub fn insert_if_absent(&mut self, id: MovieId, entry: CacheEntry) -> Result<bool> {
        if self.contains(id) {
            debug!("Cache already holds movie {}, keeping existing entry", id);
            return Ok(false);
        }
        self.put(id, entry)?;
        Ok(true)
    }

    /// True if an earlier run learned the API has no data for `id`
    pub fn is_known_miss(&self, id: MovieId) -> bool {
        self.misses.contains(&id)
    }

    pub fn miss_count(&self) -> usize {
        self.misses.len()
    }

    /// Remember that the API has no data for `id` and rewrite the sidecar
    pub fn record_miss(&mut self, id: MovieId) -> Result<()> {
        if self.misses.insert(id) {
            write_json(&self.misses_path, &self.misses)?;
        }
        Ok(())
    }

    /// Rewrite the whole cache file
    pub fn flush(&self) -> Result<()> {
        write_json(&self.path, &self.entries)
    }

    /// Entries keyed by numeric id, for the dataset merge.
    ///
    /// Keys that are not valid ids are skipped with a warning.
    pub fn lookup_table(&self) -> HashMap<MovieId, CacheEntry> {
        self.entries
            .iter()
            .filter_map(|(key, entry)| match key.parse::<MovieId>() {
                Ok(id) => Some((id, entry.clone())),
                Err(_) => {
                    warn!("Ignoring cache key {:?}: not a movie id", key);
                    None
                }
            })
            .collect()
    }
}

/// `cache.json` -> `cache.misses.json`
fn misses_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cache".to_string());
    path.with_file_name(format!("{}.misses.json", stem))
}

fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| EnrichmentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| EnrichmentError::CorruptCache {
        path: path.display().to_string(),
        source,
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json).map_err(|source| EnrichmentError::Io {
        path: path.display().to_string(),
        source,
    })
}
