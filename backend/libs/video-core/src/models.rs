//! Core video data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of catalog categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    Podcast,
    Society,
    Business,
    Relationships,
    Conspiracy,
    Other,
}

impl VideoCategory {
    /// Every category, in display order
    pub const ALL: [VideoCategory; 6] = [
        VideoCategory::Podcast,
        VideoCategory::Society,
        VideoCategory::Business,
        VideoCategory::Relationships,
        VideoCategory::Conspiracy,
        VideoCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Podcast => "podcast",
            VideoCategory::Society => "society",
            VideoCategory::Business => "business",
            VideoCategory::Relationships => "relationships",
            VideoCategory::Conspiracy => "conspiracy",
            VideoCategory::Other => "other",
        }
    }

    /// Human-readable tab label
    pub fn label(&self) -> &'static str {
        match self {
            VideoCategory::Podcast => "Podcast",
            VideoCategory::Society => "Society",
            VideoCategory::Business => "Business",
            VideoCategory::Relationships => "Relationships",
            VideoCategory::Conspiracy => "Conspiracy",
            VideoCategory::Other => "Other",
        }
    }
}

impl fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown video category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for VideoCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        VideoCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Normalized display record for one externally hosted video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    /// Opaque upstream identifier
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub category: VideoCategory,
    /// K/M suffixed view count, e.g. "1.2M"
    pub views: String,
    /// "H:MM:SS" or "MM:SS"
    pub duration: String,
    /// Coarse relative bucket, e.g. "3 days ago"
    pub published_relative: String,
    pub published_at: DateTime<Utc>,
}
