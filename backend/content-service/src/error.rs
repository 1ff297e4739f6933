/// Error types for Content Service
///
/// Errors are converted to JSON HTTP responses for API clients.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use tracing::warn;

use crate::services::CatalogError;

/// Client-facing message for upstream failures
pub const UPSTREAM_UNAVAILABLE: &str = "video platform unavailable";

/// Result type for content-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Upstream video platform failed and nothing was cached
    Upstream(String),

    /// Validation failed
    ValidationError(String),

    /// Unauthorized access
    Unauthorized(String),

    /// Feature disabled by configuration
    ServiceUnavailable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidMaxResults { .. } => AppError::ValidationError(err.to_string()),
            CatalogError::Upstream(e) => {
                // upstream bodies stay in the logs, not in client responses
                warn!(error = %e, kind = e.kind(), "Video platform request failed");
                AppError::Upstream(UPSTREAM_UNAVAILABLE.to_string())
            }
        }
    }
}
