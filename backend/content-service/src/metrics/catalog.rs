use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Catalog requests served, segmented by source (cache, upstream, stale).
    pub static ref CATALOG_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "video_catalog_request_total",
        "Video catalog requests segmented by data source",
        &["source"]
    )
    .expect("failed to register video_catalog_request_total");

    /// Duration of full upstream refetches (resolve + search + details).
    pub static ref CATALOG_FETCH_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "video_catalog_fetch_duration_seconds",
        "Video catalog refetch duration segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register video_catalog_fetch_duration_seconds");

    /// Duration of individual upstream API calls.
    pub static ref UPSTREAM_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "video_platform_request_duration_seconds",
        "Video platform API call duration segmented by endpoint",
        &["endpoint"]
    )
    .expect("failed to register video_platform_request_duration_seconds");

    /// Upstream failures segmented by error kind.
    pub static ref UPSTREAM_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "video_platform_errors_total",
        "Video platform failures segmented by error kind",
        &["kind"]
    )
    .expect("failed to register video_platform_errors_total");
}
