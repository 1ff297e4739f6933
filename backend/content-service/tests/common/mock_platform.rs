//! Mock VideoPlatform for Integration Tests
//!
//! Serves scripted detail records without any network access and counts
//! upstream calls so tests can tell a cache hit from a refetch.

use async_trait::async_trait;
use content_service::clients::{ChannelRef, UpstreamError, UpstreamResult, VideoDetail, VideoPlatform};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const CHANNEL_ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";

/// Build a detail record the way the platform returns it
pub fn detail(id: &str, title: &str, published_at: &str, views: Option<&str>) -> VideoDetail {
    let mut statistics = serde_json::json!({});
    if let Some(views) = views {
        statistics = serde_json::json!({ "viewCount": views });
    }

    serde_json::from_value(serde_json::json!({
        "id": id,
        "snippet": {
            "title": title,
            "description": format!("{} description", title),
            "publishedAt": published_at,
            "thumbnails": {
                "default": { "url": format!("https://img.example/{}/default.jpg", id) },
                "high": { "url": format!("https://img.example/{}/high.jpg", id) }
            }
        },
        "contentDetails": { "duration": "PT12M7S" },
        "statistics": statistics
    }))
    .unwrap()
}

#[derive(Clone)]
pub struct MockPlatform {
    /// Newest first
    videos: Arc<Vec<VideoDetail>>,
    failing: Arc<AtomicBool>,
    search_calls: Arc<AtomicUsize>,
}

impl MockPlatform {
    pub fn new(videos: Vec<VideoDetail>) -> Self {
        Self {
            videos: Arc::new(videos),
            failing: Arc::new(AtomicBool::new(false)),
            search_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of recent-video searches issued so far
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn check(&self, endpoint: &'static str) -> UpstreamResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status {
                endpoint,
                status: 403,
                body: "quotaExceeded".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    async fn resolve_channel(&self, channel: &ChannelRef) -> UpstreamResult<String> {
        match channel {
            ChannelRef::Id(id) => Ok(id.clone()),
            ChannelRef::Handle(_) => {
                self.check("channels")?;
                Ok(CHANNEL_ID.to_string())
            }
        }
    }

    async fn recent_video_ids(&self, _channel_id: &str, max: usize) -> UpstreamResult<Vec<String>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check("search")?;
        Ok(self.videos.iter().take(max).map(|v| v.id.clone()).collect())
    }

    async fn video_details(&self, ids: &[String]) -> UpstreamResult<Vec<VideoDetail>> {
        self.check("videos")?;
        Ok(self
            .videos
            .iter()
            .filter(|v| ids.contains(&v.id))
            .cloned()
            .collect())
    }
}
