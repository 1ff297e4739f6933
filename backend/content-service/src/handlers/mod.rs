/// HTTP handlers for content-related endpoints
///
/// This module contains handlers for:
/// - Videos: recent creator videos, optionally filtered by category
/// - Admin: forced catalog refresh behind a bearer token
/// - Health: liveness and readiness probes
pub mod admin;
pub mod health;
pub mod videos;

pub use admin::refresh_videos;
pub use health::{health_summary, liveness_check, readiness_summary, HealthState};
pub use videos::{list_categories, list_videos, VideoHandlerState, CATALOG_SOURCE_HEADER};

use actix_web::web;

use crate::metrics::serve_metrics;
use crate::middleware::MetricsMiddleware;

/// Register every route. App data (`VideoHandlerState`, `HealthState`,
/// `AdminAuth`) must be registered by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(serve_metrics))
        .route("/api/v1/health", web::get().to(health_summary))
        .route("/api/v1/health/ready", web::get().to(readiness_summary))
        .route("/api/v1/health/live", web::get().to(liveness_check))
        .service(
            web::scope("/api/v1")
                .wrap(MetricsMiddleware)
                .service(
                    web::scope("/videos")
                        .route("", web::get().to(list_videos))
                        .route("/categories", web::get().to(list_categories)),
                )
                .service(
                    web::scope("/admin")
                        .route("/videos/refresh", web::post().to(refresh_videos)),
                ),
        );
}
