//! Cache key schema
//!
//! Key format: v{VERSION}:{entity}:{identifier}

/// Cache schema version - increment when changing the entry layout
pub const CACHE_VERSION: u32 = 1;

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Catalog slot for one channel
    /// Format: v1:videos:{channel}
    pub fn video_catalog(channel: &str) -> String {
        format!("v{}:videos:{}", CACHE_VERSION, channel.trim())
    }

    /// Extract entity type from key
    pub fn entity_type(key: &str) -> Option<&str> {
        let mut parts = key.split(':');
        parts.next()?;
        parts.next()
    }
}
