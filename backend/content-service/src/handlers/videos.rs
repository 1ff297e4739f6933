use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::{category_options, VideoListResponse};
use crate::services::{CatalogSource, VideoCatalogService};
use video_core::constants::MAX_RESULTS_LIMIT;
use video_core::VideoCategory;

/// Header mirroring where the listing came from (cache, upstream, stale)
pub const CATALOG_SOURCE_HEADER: &str = "X-Catalog-Source";

#[derive(Debug, Deserialize)]
pub struct VideoQueryParams {
    pub limit: Option<usize>,
    pub category: Option<String>,
}

impl VideoQueryParams {
    pub(crate) fn limit_or(&self, default_limit: usize) -> Result<usize> {
        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 || limit > MAX_RESULTS_LIMIT {
            return Err(AppError::ValidationError(format!(
                "limit must be between 1 and {}",
                MAX_RESULTS_LIMIT
            )));
        }
        Ok(limit)
    }

    /// `None` for "all" or no filter
    pub(crate) fn category_filter(&self) -> Result<Option<VideoCategory>> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => value
                .parse::<VideoCategory>()
                .map(Some)
                .map_err(|e| AppError::ValidationError(e.to_string())),
        }
    }
}

pub struct VideoHandlerState {
    pub catalog: Arc<VideoCatalogService>,
    pub default_limit: usize,
}

pub async fn list_videos(
    query: web::Query<VideoQueryParams>,
    state: web::Data<VideoHandlerState>,
) -> Result<HttpResponse> {
    let limit = query.limit_or(state.default_limit)?;
    let category = query.category_filter()?;

    debug!(limit = limit, category = ?category, "Video catalog request");

    let listing = match category {
        Some(category) => {
            state
                .catalog
                .get_videos_by_category(category, limit)
                .await?
        }
        None => state.catalog.get_videos(limit).await?,
    };

    if listing.source == CatalogSource::Stale {
        warn!(
            fetched_at = %listing.fetched_at,
            "Serving stale video catalog"
        );
    }

    let source = listing.source.as_str();
    Ok(HttpResponse::Ok()
        .insert_header((CATALOG_SOURCE_HEADER, source))
        .json(VideoListResponse::from(listing)))
}

pub async fn list_categories() -> HttpResponse {
    HttpResponse::Ok().json(category_options())
}
