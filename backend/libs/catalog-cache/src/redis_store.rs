//! Redis-backed catalog cache
//!
//! Entries are stored as JSON with a retention TTL well beyond the freshness
//! window, so an expired-but-present entry is still available as a fallback
//! when the upstream platform is down.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::{debug, warn};

use crate::{CacheEntry, CacheError, CacheMetrics, CacheResult, CatalogCache};

/// Default retention for stored entries (24 hours)
pub const DEFAULT_RETENTION_SECS: u64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct RedisCatalogCache {
    redis: ConnectionManager,
    retention: Duration,
    metrics: CacheMetrics,
}

impl RedisCatalogCache {
    pub fn new(redis: ConnectionManager, retention: Duration) -> Self {
        Self {
            redis,
            retention,
            metrics: CacheMetrics::new("redis"),
        }
    }

    /// Open a connection manager for `redis_url`
    pub async fn connect(redis_url: &str, retention: Duration) -> CacheResult<Self> {
        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::new(manager, retention))
    }
}

#[async_trait::async_trait]
impl CatalogCache for RedisCatalogCache {
    async fn get(&self, key: &str) -> CacheResult<Option<CacheEntry>> {
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => match serde_json::from_str::<CacheEntry>(&data) {
                Ok(entry) => {
                    debug!(key = %key, "Cache hit");
                    self.metrics.record_hit(key);
                    Ok(Some(entry))
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cache deserialization failed");
                    self.metrics.record_error("deserialize");
                    // corrupted or written by an older schema
                    let _ = conn.del::<_, ()>(key).await;
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.metrics.record_miss(key);
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis get error");
                self.metrics.record_error("redis");
                Err(CacheError::Redis(e))
            }
        }
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> CacheResult<()> {
        let data = serde_json::to_string(&entry)?;
        let ttl = self.retention.as_secs().max(1);

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, data, ttl).await.map_err(|e| {
            warn!(key = %key, error = %e, "Redis set error");
            self.metrics.record_error("redis");
            CacheError::Redis(e)
        })?;

        debug!(key = %key, items = entry.items.len(), ttl = ttl, "Cache set");
        self.metrics.record_write(key);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(key).await?;

        debug!(key = %key, "Cache delete");
        self.metrics.record_invalidation(key);
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(CacheError::Redis(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            ))))
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
