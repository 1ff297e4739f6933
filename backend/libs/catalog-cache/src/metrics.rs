//! Cache metrics for observability

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

use crate::keys::CacheKey;

lazy_static! {
    /// Cache events segmented by backend, entity and outcome (hit/miss/write/invalidate).
    static ref CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "catalog_cache_events_total",
        "Catalog cache events segmented by backend and outcome",
        &["backend", "entity", "event"]
    )
    .expect("failed to register catalog_cache_events_total");

    /// Cache errors segmented by backend and error type.
    static ref CACHE_ERRORS: IntCounterVec = register_int_counter_vec!(
        "catalog_cache_errors_total",
        "Catalog cache errors segmented by backend and error type",
        &["backend", "error_type"]
    )
    .expect("failed to register catalog_cache_errors_total");
}

/// Cache metrics wrapper bound to one backend label
#[derive(Clone, Copy, Debug)]
pub struct CacheMetrics {
    backend: &'static str,
}

impl CacheMetrics {
    pub fn new(backend: &'static str) -> Self {
        Self { backend }
    }

    fn event(&self, key: &str, event: &str) {
        let entity = CacheKey::entity_type(key).unwrap_or("unknown");
        CACHE_EVENTS
            .with_label_values(&[self.backend, entity, event])
            .inc();
    }

    pub fn record_hit(&self, key: &str) {
        self.event(key, "hit");
    }

    pub fn record_miss(&self, key: &str) {
        self.event(key, "miss");
    }

    pub fn record_write(&self, key: &str) {
        self.event(key, "write");
    }

    pub fn record_invalidation(&self, key: &str) {
        self.event(key, "invalidate");
    }

    pub fn record_error(&self, error_type: &str) {
        CACHE_ERRORS
            .with_label_values(&[self.backend, error_type])
            .inc();
    }
}
