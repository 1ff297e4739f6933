/// Content Service Library
///
/// Serves the creator's video library: recent videos from the external video
/// platform, normalized for display and memoized for a fixed freshness window.
///
/// # Modules
///
/// - `clients`: Upstream video platform client and trait seam
/// - `services`: Catalog fetcher (cache, refetch, stale fallback)
/// - `handlers`: HTTP request handlers and route registration
/// - `middleware`: Admin session extractor and request metrics
/// - `models`: Response structures
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
