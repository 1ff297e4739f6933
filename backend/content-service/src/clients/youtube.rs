//! YouTube Data API v3 client
//!
//! Only the three read endpoints the catalog needs are covered: `channels`,
//! `search` and `videos`. The API key travels as the `key` query parameter and
//! is stripped from transport errors before they are logged.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{ChannelRef, UpstreamError, UpstreamResult, VideoPlatform};
use crate::metrics::catalog::UPSTREAM_REQUEST_DURATION_SECONDS;
use video_core::constants::UPSTREAM_BATCH_LIMIT;

/// Detail record from `videos?part=contentDetails,statistics,snippet`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: String,
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Statistics,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Highest resolution available: high, then medium, then default
    pub fn best_url(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    /// ISO-8601 duration, e.g. `PT12M7S`
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Absent when the owner hides statistics
    pub view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
    channel_id: Option<String>,
}

#[derive(Clone)]
pub struct YouTubeClient {
    http_client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> UpstreamResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| UpstreamError::Http {
                endpoint: "client",
                source,
            })?;

        Ok(Self {
            http_client: Arc::new(http_client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> UpstreamResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let timer = UPSTREAM_REQUEST_DURATION_SECONDS
            .with_label_values(&[endpoint])
            .start_timer();

        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Http {
                endpoint,
                source: e.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            timer.observe_duration();
            return Err(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::Decode {
                endpoint,
                source: e.without_url(),
            });
        timer.observe_duration();
        parsed
    }

    async fn channel_by_username(&self, username: &str) -> UpstreamResult<Option<String>> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("forUsername", username), ("part", "id")])
            .await?;
        Ok(response.items.into_iter().next().map(|item| item.id))
    }

    async fn channel_by_search(&self, query: &str) -> UpstreamResult<Option<String>> {
        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("q", query),
                    ("type", "channel"),
                    ("part", "id"),
                    ("maxResults", "1"),
                ],
            )
            .await?;
        Ok(response
            .items
            .into_iter()
            .find_map(|item| item.id.channel_id))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn resolve_channel(&self, channel: &ChannelRef) -> UpstreamResult<String> {
        let handle = match channel {
            ChannelRef::Id(id) => return Ok(id.clone()),
            ChannelRef::Handle(handle) => handle,
        };

        if let Some(id) = self.channel_by_username(handle).await? {
            debug!(handle = %handle, channel_id = %id, "Channel resolved by username");
            return Ok(id);
        }

        // handles that are not legacy usernames are only reachable via search
        match self.channel_by_search(handle).await? {
            Some(id) => {
                info!(handle = %handle, channel_id = %id, "Channel resolved by search");
                Ok(id)
            }
            None => Err(UpstreamError::ChannelNotFound(handle.clone())),
        }
    }

    async fn recent_video_ids(&self, channel_id: &str, max: usize) -> UpstreamResult<Vec<String>> {
        let max_results = max.clamp(1, UPSTREAM_BATCH_LIMIT).to_string();
        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("channelId", channel_id),
                    ("part", "id"),
                    ("order", "date"),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn video_details(&self, ids: &[String]) -> UpstreamResult<Vec<VideoDetail>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let response: ListResponse<VideoDetail> = self
            .get_json(
                "videos",
                &[
                    ("id", joined.as_str()),
                    ("part", "contentDetails,statistics,snippet"),
                ],
            )
            .await?;
        Ok(response.items)
    }
}
