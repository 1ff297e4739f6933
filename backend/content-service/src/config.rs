/// Configuration management for Content Service
///
/// This module handles loading and managing configuration from environment
/// variables (a `.env` file is honored by the binary before loading).
use serde::{Deserialize, Serialize};
use std::time::Duration;

use catalog_cache::redis_store::DEFAULT_RETENTION_SECS;
use video_core::constants::{DEFAULT_MAX_RESULTS, FRESHNESS_WINDOW_SECS, MAX_RESULTS_LIMIT};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Upstream video platform configuration
    pub youtube: YouTubeConfig,
    /// Catalog behavior
    pub catalog: CatalogConfig,
    /// Cache backend configuration
    pub cache: CacheConfig,
    /// Admin endpoint configuration
    pub admin: AdminConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Upstream video platform configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
    /// Channel id (`UC...`) or handle/username
    pub channel: String,
    pub request_timeout_ms: u64,
}

impl std::fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("channel", &self.channel)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl YouTubeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Catalog behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub freshness_window_secs: u64,
    pub default_limit: usize,
}

impl CatalogConfig {
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }
}

/// Cache backend configuration; in-process when no Redis URL is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: Option<String>,
    pub retention_secs: u64,
}

/// Admin endpoint configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token for admin routes; admin routes are disabled when unset
    pub api_token: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("CONTENT_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("CONTENT_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8081),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            youtube: {
                let api_key = std::env::var("YOUTUBE_API_KEY").unwrap_or_default();
                if production && api_key.trim().is_empty() {
                    return Err("YOUTUBE_API_KEY must be set in production".to_string());
                }

                let channel = std::env::var("YOUTUBE_CHANNEL")
                    .map_err(|_| "YOUTUBE_CHANNEL must be set".to_string())?;
                if channel.trim().is_empty() {
                    return Err("YOUTUBE_CHANNEL cannot be empty".to_string());
                }

                YouTubeConfig {
                    api_key,
                    base_url: std::env::var("YOUTUBE_API_BASE_URL")
                        .unwrap_or_else(|_| DEFAULT_YOUTUBE_BASE_URL.to_string()),
                    channel: channel.trim().to_string(),
                    request_timeout_ms: parse_env_or_default("YOUTUBE_REQUEST_TIMEOUT_MS", 10_000)?,
                }
            },
            catalog: {
                let freshness_window_secs =
                    parse_env_or_default("CATALOG_FRESHNESS_WINDOW_SECS", FRESHNESS_WINDOW_SECS)?;
                let default_limit: usize =
                    parse_env_or_default("CATALOG_DEFAULT_LIMIT", DEFAULT_MAX_RESULTS)?;
                if default_limit == 0 || default_limit > MAX_RESULTS_LIMIT {
                    return Err(format!(
                        "CATALOG_DEFAULT_LIMIT must be between 1 and {}",
                        MAX_RESULTS_LIMIT
                    ));
                }

                CatalogConfig {
                    freshness_window_secs,
                    default_limit,
                }
            },
            cache: CacheConfig {
                redis_url: std::env::var("REDIS_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                retention_secs: parse_env_or_default(
                    "CATALOG_CACHE_RETENTION_SECS",
                    DEFAULT_RETENTION_SECS,
                )?,
            },
            admin: AdminConfig {
                api_token: std::env::var("ADMIN_API_TOKEN")
                    .ok()
                    .filter(|token| !token.trim().is_empty()),
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
