//! Process-wide dataset cache keyed by source locations
//!
//! Cached datasets are shared as `Arc<Dataset>` and never mutated, so any number
//! of sessions can read one while another session triggers a reload.

use crate::error::Result;
use crate::ingestion::types::Dataset;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Identifies one loaded dataset: the pair of locations it was read from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub tenancy: String,
    pub projects: String,
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tenancy: {}, projects: {}", self.tenancy, self.projects)
    }
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<SourceKey, Arc<Dataset>>>,
    // One gate per key; held for the duration of a load
    loading: Mutex<HashMap<SourceKey, Arc<Mutex<()>>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &SourceKey) -> Option<Arc<Dataset>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Return the cached dataset for `key`, running `load` on a miss.
    ///
    /// Concurrent misses on the same key wait for a single load. The map lock is
    /// only taken to look up and to insert, so reads of other keys never wait on a
    /// fetch. A failed load caches nothing.
    pub async fn get_or_load<F, Fut>(&self, key: &SourceKey, load: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Dataset>>,
    {
        if let Some(dataset) = self.get(key).await {
            debug!("Dataset cache hit ({})", key);
            return Ok(dataset);
        }

        let gate = self.gate(key).await;
        let _loading = gate.lock().await;

        if let Some(dataset) = self.get(key).await {
            debug!("Dataset loaded by another session ({})", key);
            return Ok(dataset);
        }

        info!("Dataset cache miss, loading ({})", key);
        let dataset = Arc::new(load().await?);
        self.entries
            .write()
            .await
            .insert(key.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    async fn gate(&self, key: &SourceKey) -> Arc<Mutex<()>> {
        let mut loading = self.loading.lock().await;
        Arc::clone(loading.entry(key.clone()).or_default())
    }

    /// Drop one dataset so the next request reloads it. Returns whether it was cached.
    pub async fn invalidate(&self, key: &SourceKey) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            info!("Invalidated cached dataset ({})", key);
        }
        removed
    }

    /// Drop every cached dataset
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        info!("Clearing {} cached dataset(s)", entries.len());
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
