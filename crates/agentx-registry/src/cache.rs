//! Discovery cache — JSON, keyed on coarse source mtimes.
//!
//! Validation is constant-time: a "coarse mtime" per source is the max of
//! the base directory, each existing category directory, and each immediate
//! child of those categories. It admits unnecessary rebuilds, never stale
//! reads. Corrupt or missing cache means a full rebuild; writes are
//! best-effort and never block discovery.

use crate::discover::{discover_all, DiscoveredType};
use agentx_core::{Category, Source};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoveryCache {
    pub types: Vec<DiscoveredType>,
    /// Source name → coarse mtime (epoch seconds) at cache time.
    pub source_mtimes: BTreeMap<String, i64>,
    pub cached_at: DateTime<Utc>,
}

impl DiscoveryCache {
    /// Valid only for an identical source set with unchanged coarse mtimes.
    pub fn is_valid(&self, sources: &[Source]) -> bool {
        if self.source_mtimes.len() != sources.len() {
            return false;
        }
        sources
            .iter()
            .all(|s| self.source_mtimes.get(&s.name) == Some(&coarse_mtime(s)))
    }
}

/// Discovery through the cache: reuse when valid, else rebuild and persist.
pub fn discover_cached(sources: &[Source], cache_file: &Path) -> Vec<DiscoveredType> {
    if let Some(cache) = load(cache_file) {
        if cache.is_valid(sources) {
            return cache.types;
        }
    }
    let types = discover_all(sources);
    let cache = DiscoveryCache {
        types: types.clone(),
        source_mtimes: sources
            .iter()
            .map(|s| (s.name.clone(), coarse_mtime(s)))
            .collect(),
        cached_at: Utc::now(),
    };
    store(cache_file, &cache);
    types
}

/// max(mtime(base), mtimes of each existing category dir, mtimes of each
/// immediate child of those dirs). Missing paths contribute nothing.
pub fn coarse_mtime(source: &Source) -> i64 {
    let mut max = mtime_secs(&source.base).unwrap_or(0);
    for category in Category::ALL {
        let cat_dir = source.category_dir(category);
        let Some(cat_mtime) = mtime_secs(&cat_dir) else {
            continue;
        };
        max = max.max(cat_mtime);
        let Ok(entries) = fs::read_dir(&cat_dir) else {
            continue;
        };
        for entry in entries.flatten() {
            if let Some(m) = mtime_secs(&entry.path()) {
                max = max.max(m);
            }
        }
    }
    max
}

fn mtime_secs(path: &Path) -> Option<i64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(secs as i64)
}

pub fn load(path: &Path) -> Option<DiscoveryCache> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(cache) => Some(cache),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "discarding corrupt discovery cache");
            None
        }
    }
}

/// Last-writer-wins; failure only logs.
pub fn store(path: &Path, cache: &DiscoveryCache) {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(cache)?;
        fs::write(path, body)
    };
    if let Err(e) = write() {
        tracing::debug!(path = %path.display(), error = %e, "cache write failed");
    }
}
