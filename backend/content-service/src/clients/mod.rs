/// Upstream video platform access
///
/// The catalog service talks to the platform through [`VideoPlatform`] so
/// tests can substitute a scripted fake for the HTTP client.
pub mod youtube;

pub use youtube::{VideoDetail, YouTubeClient};

use async_trait::async_trait;
use thiserror::Error;

/// Channel identifier as configured: a direct id or a human-readable handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    Id(String),
    Handle(String),
}

impl ChannelRef {
    /// `UC` + 22 characters is a channel id; anything else is a handle.
    /// A leading `@` is dropped from handles.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.len() == 24 && raw.starts_with("UC") {
            ChannelRef::Id(raw.to_string())
        } else {
            ChannelRef::Handle(raw.trim_start_matches('@').to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChannelRef::Id(id) => id,
            ChannelRef::Handle(handle) => handle,
        }
    }
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{endpoint} request failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("{endpoint} response could not be decoded: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("channel '{0}' could not be resolved")]
    ChannelNotFound(String),

    #[error("no videos returned for channel {0}")]
    NoVideos(String),
}

impl UpstreamError {
    /// Short label used for the `kind` metric dimension
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Http { .. } => "http",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
            UpstreamError::ChannelNotFound(_) => "channel_not_found",
            UpstreamError::NoVideos(_) => "no_videos",
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Read API of the external video platform
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Channel id for `channel`; ids pass through without a call
    async fn resolve_channel(&self, channel: &ChannelRef) -> UpstreamResult<String>;

    /// Up to `max` most recent video ids, newest first
    async fn recent_video_ids(&self, channel_id: &str, max: usize) -> UpstreamResult<Vec<String>>;

    /// Detail records for at most one upstream batch of ids
    async fn video_details(&self, ids: &[String]) -> UpstreamResult<Vec<VideoDetail>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ref_parse() {
        assert_eq!(
            ChannelRef::parse("UC_x5XG1OV2P6uZZ5FSM9Ttw"),
            ChannelRef::Id("UC_x5XG1OV2P6uZZ5FSM9Ttw".to_string())
        );
        assert_eq!(
            ChannelRef::parse("@JackMorgan_RLP"),
            ChannelRef::Handle("JackMorgan_RLP".to_string())
        );
        // right prefix, wrong length
        assert_eq!(
            ChannelRef::parse("UCshort"),
            ChannelRef::Handle("UCshort".to_string())
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            UpstreamError::ChannelNotFound("x".into()).kind(),
            "channel_not_found"
        );
        let status = UpstreamError::Status {
            endpoint: "videos",
            status: 403,
            body: "quotaExceeded".into(),
        };
        assert_eq!(status.kind(), "status");
        assert!(status.to_string().contains("403"));
    }
}
