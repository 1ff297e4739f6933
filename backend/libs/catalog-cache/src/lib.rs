//! Catalog caching layer
//!
//! Memoizes the normalized video catalog behind an injected [`CatalogCache`]
//! instead of process-wide state:
//! - [`CacheEntry`] carries the items and their fetch timestamp
//! - freshness is decided by the caller against its own window
//! - entries outlive the window so stale data can serve as a fallback
//! - in-memory and Redis backends share the same trait

mod error;
mod keys;
mod metrics;

pub mod clock;
pub mod memory;
pub mod redis_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, CACHE_VERSION};
pub use memory::InMemoryCatalogCache;
pub use metrics::CacheMetrics;
pub use redis_store::RedisCatalogCache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use video_core::VideoSummary;

/// One memoized catalog batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub items: Vec<VideoSummary>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(items: Vec<VideoSummary>, fetched_at: DateTime<Utc>) -> Self {
        Self { items, fetched_at }
    }

    /// Age relative to `now`; an entry stamped in the future has age zero.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) < window
    }

    /// First `max` items, in upstream order
    pub fn head(&self, max: usize) -> &[VideoSummary] {
        &self.items[..self.items.len().min(max)]
    }
}

/// Read-through memoization slot keyed by [`CacheKey`]
#[async_trait::async_trait]
pub trait CatalogCache: Send + Sync {
    /// Stored entry for `key`, fresh or not
    async fn get(&self, key: &str) -> CacheResult<Option<CacheEntry>>;

    /// Replace the entry for `key` wholesale
    async fn set(&self, key: &str, entry: CacheEntry) -> CacheResult<()>;

    /// Drop the entry for `key`
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Backend reachability, used by readiness checks
    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }

    /// Backend label for logs and metrics
    fn backend(&self) -> &'static str;
}
