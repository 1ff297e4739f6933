/// Response models for content-service
///
/// Request/response shapes for the video catalog endpoints. Video records
/// themselves come from `video-core`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use video_core::{VideoCategory, VideoSummary};

use crate::services::VideoListing;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    pub videos: Vec<VideoSummary>,
    pub count: usize,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<VideoListing> for VideoListResponse {
    fn from(listing: VideoListing) -> Self {
        Self {
            count: listing.videos.len(),
            source: listing.source.as_str().to_string(),
            videos: listing.videos,
            fetched_at: listing.fetched_at,
        }
    }
}

/// One category tab
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryOption {
    pub id: String,
    pub label: String,
}

/// Tabs in display order, `all` first
pub fn category_options() -> Vec<CategoryOption> {
    std::iter::once(CategoryOption {
        id: "all".to_string(),
        label: "All".to_string(),
    })
    .chain(VideoCategory::ALL.into_iter().map(|category| CategoryOption {
        id: category.as_str().to_string(),
        label: category.label().to_string(),
    }))
    .collect()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub refreshed: usize,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<VideoListing> for RefreshResponse {
    fn from(listing: VideoListing) -> Self {
        Self {
            refreshed: listing.videos.len(),
            source: listing.source.as_str().to_string(),
            fetched_at: listing.fetched_at,
        }
    }
}
