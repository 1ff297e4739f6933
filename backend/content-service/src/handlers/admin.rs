use actix_web::{web, HttpResponse};
use tracing::info;

use crate::error::Result;
use crate::handlers::videos::VideoHandlerState;
use crate::middleware::AdminSession;
use crate::models::RefreshResponse;

/// Force a refetch of the catalog, ignoring the freshness window.
pub async fn refresh_videos(
    _session: AdminSession,
    state: web::Data<VideoHandlerState>,
) -> Result<HttpResponse> {
    let listing = state.catalog.refresh().await?;
    info!(
        videos = listing.videos.len(),
        channel = state.catalog.channel().as_str(),
        "Video catalog refreshed by admin"
    );
    Ok(HttpResponse::Ok().json(RefreshResponse::from(listing)))
}
