//! In-process catalog cache

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{CacheEntry, CacheMetrics, CacheResult, CatalogCache};

/// Process-local cache; the default when no Redis is configured
pub struct InMemoryCatalogCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    metrics: CacheMetrics,
}

impl InMemoryCatalogCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            metrics: CacheMetrics::new("memory"),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryCatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogCache for InMemoryCatalogCache {
    async fn get(&self, key: &str) -> CacheResult<Option<CacheEntry>> {
        let entry = self.entries.read().await.get(key).cloned();
        match &entry {
            Some(_) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit(key);
            }
            None => {
                debug!(key = %key, "Cache miss");
                self.metrics.record_miss(key);
            }
        }
        Ok(entry)
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> CacheResult<()> {
        let count = entry.items.len();
        self.entries.write().await.insert(key.to_string(), entry);
        debug!(key = %key, items = count, "Cache set");
        self.metrics.record_write(key);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.write().await.remove(key);
        debug!(key = %key, "Cache delete");
        self.metrics.record_invalidation(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
