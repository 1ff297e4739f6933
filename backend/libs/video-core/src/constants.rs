//! Video catalog constants

/// Freshness window for a cached catalog (5 minutes)
pub const FRESHNESS_WINDOW_SECS: u64 = 5 * 60;

/// Upstream batch limit for search pages and detail lookups
pub const UPSTREAM_BATCH_LIMIT: usize = 50;

/// Largest `maxResults` a caller may ask for
pub const MAX_RESULTS_LIMIT: usize = UPSTREAM_BATCH_LIMIT;

/// Result count used when the caller does not ask for one
pub const DEFAULT_MAX_RESULTS: usize = 9;

/// Rendered when an ISO-8601 duration cannot be parsed
pub const UNKNOWN_DURATION: &str = "00:00";
