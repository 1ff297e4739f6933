//! Video catalog fetcher
//!
//! Serves the creator's recent videos from the injected cache while the entry
//! is inside the freshness window, and otherwise refetches from the platform:
//! resolve channel → recent ids → batched details → normalize → store.
//! A failed refetch falls back to whatever entry is cached, however old.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use catalog_cache::{CacheEntry, CacheKey, CatalogCache, Clock};
use video_core::constants::{MAX_RESULTS_LIMIT, UPSTREAM_BATCH_LIMIT};
use video_core::{
    classify_title, format_duration, format_relative, format_view_count, VideoCategory,
    VideoSummary,
};

use crate::clients::{ChannelRef, UpstreamError, VideoDetail, VideoPlatform};
use crate::metrics::catalog::{
    CATALOG_FETCH_DURATION_SECONDS, CATALOG_REQUEST_TOTAL, UPSTREAM_ERRORS_TOTAL,
};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("maxResults must be between 1 and {max}, got {requested}")]
    InvalidMaxResults { requested: usize, max: usize },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Where a listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Fresh cache entry, no upstream call
    Cache,
    /// Refetched from the platform during this call
    Upstream,
    /// Refetch failed; served an expired entry
    Stale,
}

impl CatalogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Cache => "cache",
            CatalogSource::Upstream => "upstream",
            CatalogSource::Stale => "stale",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoListing {
    pub videos: Vec<VideoSummary>,
    pub source: CatalogSource,
    pub fetched_at: DateTime<Utc>,
}

pub struct VideoCatalogService {
    platform: Arc<dyn VideoPlatform>,
    cache: Arc<dyn CatalogCache>,
    clock: Arc<dyn Clock>,
    channel: ChannelRef,
    freshness_window: Duration,
}

impl VideoCatalogService {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        cache: Arc<dyn CatalogCache>,
        clock: Arc<dyn Clock>,
        channel: ChannelRef,
        freshness_window: Duration,
    ) -> Self {
        Self {
            platform,
            cache,
            clock,
            channel,
            freshness_window,
        }
    }

    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    fn cache_key(&self) -> String {
        CacheKey::video_catalog(self.channel.as_str())
    }

    /// First `max_results` videos, newest first.
    pub async fn get_videos(&self, max_results: usize) -> CatalogResult<VideoListing> {
        validate_max_results(max_results)?;
        let (entry, source) = self.load().await?;

        Ok(VideoListing {
            videos: entry.head(max_results).to_vec(),
            source,
            fetched_at: entry.fetched_at,
        })
    }

    /// First `max_results` videos of `category`, newest first.
    pub async fn get_videos_by_category(
        &self,
        category: VideoCategory,
        max_results: usize,
    ) -> CatalogResult<VideoListing> {
        validate_max_results(max_results)?;
        let (entry, source) = self.load().await?;

        let videos = entry
            .items
            .iter()
            .filter(|video| video.category == category)
            .take(max_results)
            .cloned()
            .collect();

        Ok(VideoListing {
            videos,
            source,
            fetched_at: entry.fetched_at,
        })
    }

    /// Refetch regardless of freshness and replace the cached entry.
    /// Failures propagate; no stale fallback.
    pub async fn refresh(&self) -> CatalogResult<VideoListing> {
        let key = self.cache_key();
        let entry = self.fetch_and_store(&key).await?;
        CATALOG_REQUEST_TOTAL
            .with_label_values(&[CatalogSource::Upstream.as_str()])
            .inc();

        Ok(VideoListing {
            videos: entry.items,
            source: CatalogSource::Upstream,
            fetched_at: entry.fetched_at,
        })
    }

    async fn load(&self) -> CatalogResult<(CacheEntry, CatalogSource)> {
        let key = self.cache_key();
        let cached = self.read_cache(&key).await;
        let now = self.clock.now();

        let (entry, source) = match cached {
            Some(entry) if entry.is_fresh(now, self.freshness_window) => {
                debug!(key = %key, age_secs = entry.age(now).as_secs(), "Serving fresh catalog");
                (entry, CatalogSource::Cache)
            }
            cached => match self.fetch_and_store(&key).await {
                Ok(entry) => (entry, CatalogSource::Upstream),
                Err(e) => match cached {
                    Some(entry) => {
                        warn!(
                            key = %key,
                            error = %e,
                            age_secs = entry.age(now).as_secs(),
                            "Catalog refetch failed; serving stale entry"
                        );
                        (entry, CatalogSource::Stale)
                    }
                    None => return Err(e.into()),
                },
            },
        };

        CATALOG_REQUEST_TOTAL
            .with_label_values(&[source.as_str()])
            .inc();
        Ok((entry, source))
    }

    async fn read_cache(&self, key: &str) -> Option<CacheEntry> {
        match self.cache.get(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    key = %key,
                    backend = self.cache.backend(),
                    error = %e,
                    "Catalog cache read failed; treating as absent"
                );
                None
            }
        }
    }

    async fn fetch_and_store(&self, key: &str) -> Result<CacheEntry, UpstreamError> {
        let started = Instant::now();
        let result = self.fetch().await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        CATALOG_FETCH_DURATION_SECONDS
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());

        let items = result.map_err(|e| {
            UPSTREAM_ERRORS_TOTAL.with_label_values(&[e.kind()]).inc();
            e
        })?;

        let entry = CacheEntry::new(items, self.clock.now());
        if let Err(e) = self.cache.set(key, entry.clone()).await {
            warn!(
                key = %key,
                backend = self.cache.backend(),
                error = %e,
                "Catalog cache write failed"
            );
        }

        info!(
            key = %key,
            videos = entry.items.len(),
            "Catalog refetched from upstream"
        );
        Ok(entry)
    }

    async fn fetch(&self) -> Result<Vec<VideoSummary>, UpstreamError> {
        let channel_id = self.platform.resolve_channel(&self.channel).await?;

        let ids = dedupe(
            self.platform
                .recent_video_ids(&channel_id, UPSTREAM_BATCH_LIMIT)
                .await?,
        );
        if ids.is_empty() {
            return Err(UpstreamError::NoVideos(channel_id));
        }

        let mut details: HashMap<String, VideoDetail> = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(UPSTREAM_BATCH_LIMIT) {
            for detail in self.platform.video_details(chunk).await? {
                details.insert(detail.id.clone(), detail);
            }
        }

        let now = self.clock.now();
        let videos: Vec<VideoSummary> = ids
            .iter()
            .filter_map(|id| match details.get(id) {
                Some(detail) => Some(normalize(detail, now)),
                None => {
                    warn!(video_id = %id, "No detail record for video; skipping");
                    None
                }
            })
            .collect();

        if videos.is_empty() {
            return Err(UpstreamError::NoVideos(channel_id));
        }
        Ok(videos)
    }
}

fn validate_max_results(max_results: usize) -> CatalogResult<()> {
    if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
        return Err(CatalogError::InvalidMaxResults {
            requested: max_results,
            max: MAX_RESULTS_LIMIT,
        });
    }
    Ok(())
}

/// Drop repeated ids, keeping the first occurrence.
fn dedupe(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Build the display record for one upstream detail.
pub fn normalize(detail: &VideoDetail, now: DateTime<Utc>) -> VideoSummary {
    let snippet = &detail.snippet;

    VideoSummary {
        id: detail.id.clone(),
        title: snippet.title.clone(),
        description: snippet.description.clone(),
        thumbnail_url: snippet.thumbnails.best_url().unwrap_or_default().to_string(),
        category: classify_title(&snippet.title),
        views: format_view_count(detail.statistics.view_count.as_deref()),
        duration: format_duration(&detail.content_details.duration),
        published_relative: format_relative(snippet.published_at, now),
        published_at: snippet.published_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_cache::{CacheResult, InMemoryCatalogCache, ManualClock};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn detail(id: &str, title: &str) -> VideoDetail {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "snippet": {
                "title": title,
                "description": format!("About {}", title),
                "publishedAt": "2024-05-29T12:00:00Z",
                "thumbnails": {"high": {"url": format!("https://i.ytimg.com/vi/{}/hq.jpg", id)}}
            },
            "contentDetails": {"duration": "PT1H2M3S"},
            "statistics": {"viewCount": "1234000"}
        }))
        .unwrap()
    }

    /// Scripted platform: `count` videos v0..vN, optional failure switch.
    struct FakePlatform {
        count: usize,
        failing: AtomicBool,
        search_calls: AtomicUsize,
        detail_batches: Mutex<Vec<usize>>,
    }

    impl FakePlatform {
        fn new(count: usize) -> Self {
            Self {
                count,
                failing: AtomicBool::new(false),
                search_calls: AtomicUsize::new(0),
                detail_batches: Mutex::new(Vec::new()),
            }
        }

        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), UpstreamError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(UpstreamError::Status {
                    endpoint: "search",
                    status: 503,
                    body: "backend error".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl VideoPlatform for FakePlatform {
        async fn resolve_channel(&self, channel: &ChannelRef) -> Result<String, UpstreamError> {
            self.check()?;
            Ok(format!("UC-{}", channel.as_str()))
        }

        async fn recent_video_ids(
            &self,
            _channel_id: &str,
            max: usize,
        ) -> Result<Vec<String>, UpstreamError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok((0..self.count.min(max)).map(|i| format!("v{}", i)).collect())
        }

        async fn video_details(&self, ids: &[String]) -> Result<Vec<VideoDetail>, UpstreamError> {
            self.check()?;
            self.detail_batches.lock().unwrap().push(ids.len());
            Ok(ids
                .iter()
                .map(|id| detail(id, &format!("Business talk {}", id)))
                .collect())
        }
    }

    struct BrokenCache;

    #[async_trait]
    impl CatalogCache for BrokenCache {
        async fn get(&self, _key: &str) -> CacheResult<Option<CacheEntry>> {
            Err(serde_json::from_str::<u8>("x").unwrap_err().into())
        }

        async fn set(&self, _key: &str, _entry: CacheEntry) -> CacheResult<()> {
            Err(serde_json::from_str::<u8>("x").unwrap_err().into())
        }

        async fn invalidate(&self, _key: &str) -> CacheResult<()> {
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn service(
        platform: Arc<FakePlatform>,
        cache: Arc<dyn CatalogCache>,
        clock: Arc<ManualClock>,
    ) -> VideoCatalogService {
        VideoCatalogService::new(
            platform,
            cache,
            clock,
            ChannelRef::parse("creator"),
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn test_first_call_fetches_and_caches() {
        let platform = Arc::new(FakePlatform::new(12));
        let cache = Arc::new(InMemoryCatalogCache::new());
        let clock = Arc::new(ManualClock::new(start()));
        let svc = service(platform.clone(), cache.clone(), clock);

        let listing = svc.get_videos(9).await.unwrap();
        assert_eq!(listing.source, CatalogSource::Upstream);
        assert_eq!(listing.videos.len(), 9);
        assert_eq!(listing.videos[0].id, "v0");
        assert_eq!(listing.fetched_at, start());

        let stored = cache
            .get(&CacheKey::video_catalog("creator"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items.len(), 12);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_upstream() {
        let platform = Arc::new(FakePlatform::new(12));
        let clock = Arc::new(ManualClock::new(start()));
        let svc = service(
            platform.clone(),
            Arc::new(InMemoryCatalogCache::new()),
            clock.clone(),
        );

        svc.get_videos(12).await.unwrap();
        clock.advance(chrono::Duration::seconds(299));

        for max in 1..=12 {
            let listing = svc.get_videos(max).await.unwrap();
            assert_eq!(listing.source, CatalogSource::Cache);
            assert_eq!(listing.videos.len(), max);
        }
        assert_eq!(platform.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let platform = Arc::new(FakePlatform::new(3));
        let clock = Arc::new(ManualClock::new(start()));
        let svc = service(
            platform.clone(),
            Arc::new(InMemoryCatalogCache::new()),
            clock.clone(),
        );

        svc.get_videos(3).await.unwrap();
        clock.advance(chrono::Duration::minutes(5));

        let listing = svc.get_videos(3).await.unwrap();
        assert_eq!(listing.source, CatalogSource::Upstream);
        assert_eq!(listing.fetched_at, start() + chrono::Duration::minutes(5));
        assert_eq!(platform.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_refetch_serves_stale() {
        let platform = Arc::new(FakePlatform::new(3));
        let clock = Arc::new(ManualClock::new(start()));
        let svc = service(
            platform.clone(),
            Arc::new(InMemoryCatalogCache::new()),
            clock.clone(),
        );

        svc.get_videos(3).await.unwrap();
        clock.advance(chrono::Duration::days(3));
        platform.fail(true);

        let listing = svc.get_videos(2).await.unwrap();
        assert_eq!(listing.source, CatalogSource::Stale);
        assert_eq!(listing.videos.len(), 2);
        assert_eq!(listing.fetched_at, start());
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache_errors() {
        let platform = Arc::new(FakePlatform::new(3));
        platform.fail(true);
        let svc = service(
            platform,
            Arc::new(InMemoryCatalogCache::new()),
            Arc::new(ManualClock::new(start())),
        );

        let err = svc.get_videos(3).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Upstream(UpstreamError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_videos_is_upstream_error() {
        let svc = service(
            Arc::new(FakePlatform::new(0)),
            Arc::new(InMemoryCatalogCache::new()),
            Arc::new(ManualClock::new(start())),
        );

        let err = svc.get_videos(3).await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream(UpstreamError::NoVideos(_))));
    }

    #[tokio::test]
    async fn test_max_results_bounds() {
        let svc = service(
            Arc::new(FakePlatform::new(3)),
            Arc::new(InMemoryCatalogCache::new()),
            Arc::new(ManualClock::new(start())),
        );

        assert!(matches!(
            svc.get_videos(0).await,
            Err(CatalogError::InvalidMaxResults { requested: 0, .. })
        ));
        assert!(matches!(
            svc.get_videos(51).await,
            Err(CatalogError::InvalidMaxResults { requested: 51, .. })
        ));
        // more than cached is fine, returns what exists
        assert_eq!(svc.get_videos(50).await.unwrap().videos.len(), 3);
    }

    #[tokio::test]
    async fn test_details_fetched_in_one_batch_of_fifty() {
        let platform = Arc::new(FakePlatform::new(80));
        let svc = service(
            platform.clone(),
            Arc::new(InMemoryCatalogCache::new()),
            Arc::new(ManualClock::new(start())),
        );

        let listing = svc.get_videos(50).await.unwrap();
        assert_eq!(listing.videos.len(), 50);
        assert_eq!(*platform.detail_batches.lock().unwrap(), vec![50]);
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_upstream() {
        let platform = Arc::new(FakePlatform::new(3));
        let svc = service(
            platform.clone(),
            Arc::new(BrokenCache),
            Arc::new(ManualClock::new(start())),
        );

        let listing = svc.get_videos(3).await.unwrap();
        assert_eq!(listing.source, CatalogSource::Upstream);
        let listing = svc.get_videos(3).await.unwrap();
        assert_eq!(listing.source, CatalogSource::Upstream);
        assert_eq!(platform.calls(), 2);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_fresh_cache() {
        let platform = Arc::new(FakePlatform::new(3));
        let svc = service(
            platform.clone(),
            Arc::new(InMemoryCatalogCache::new()),
            Arc::new(ManualClock::new(start())),
        );

        svc.get_videos(3).await.unwrap();
        let listing = svc.refresh().await.unwrap();
        assert_eq!(listing.source, CatalogSource::Upstream);
        assert_eq!(listing.videos.len(), 3);
        assert_eq!(platform.calls(), 2);

        platform.fail(true);
        assert!(svc.refresh().await.is_err());
    }

    #[tokio::test]
    async fn test_category_filter() {
        let platform = Arc::new(FakePlatform::new(4));
        let svc = service(
            platform,
            Arc::new(InMemoryCatalogCache::new()),
            Arc::new(ManualClock::new(start())),
        );

        let business = svc
            .get_videos_by_category(VideoCategory::Business, 2)
            .await
            .unwrap();
        assert_eq!(business.videos.len(), 2);

        let society = svc
            .get_videos_by_category(VideoCategory::Society, 9)
            .await
            .unwrap();
        assert!(society.videos.is_empty());
        assert_eq!(society.source, CatalogSource::Cache);
    }

    #[test]
    fn test_normalize() {
        let now = start();
        let summary = normalize(&detail("abc", "The Business of Podcasts"), now);

        assert_eq!(summary.id, "abc");
        assert_eq!(summary.category, VideoCategory::Business);
        assert_eq!(summary.views, "1.2M");
        assert_eq!(summary.duration, "1:02:03");
        assert_eq!(summary.published_relative, "3 days ago");
        assert_eq!(summary.thumbnail_url, "https://i.ytimg.com/vi/abc/hq.jpg");
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let ids = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(dedupe(ids), vec!["a".to_string(), "b".to_string()]);
    }
}
