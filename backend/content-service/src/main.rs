use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use catalog_cache::{CatalogCache, InMemoryCatalogCache, RedisCatalogCache, SystemClock};
use content_service::clients::{ChannelRef, YouTubeClient};
use content_service::handlers::{self, HealthState, VideoHandlerState};
use content_service::middleware::AdminAuth;
use content_service::services::VideoCatalogService;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_cache(config: &content_service::Config) -> io::Result<Arc<dyn CatalogCache>> {
    match &config.cache.redis_url {
        Some(url) => {
            let retention = Duration::from_secs(config.cache.retention_secs);
            let cache = RedisCatalogCache::connect(url, retention)
                .await
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::Other,
                        format!("Failed to initialize Redis connection: {e}"),
                    )
                })?;
            tracing::info!(retention_secs = retention.as_secs(), "Using Redis catalog cache");
            Ok(Arc::new(cache))
        }
        None => {
            tracing::info!("REDIS_URL not set; using in-process catalog cache");
            Ok(Arc::new(InMemoryCatalogCache::new()))
        }
    }
}

/// Content Service
///
/// Serves the creator's recent videos for the storefront's content library.
///
/// # Routes
///
/// - `GET /api/v1/videos` - Recent videos (`limit`, `category`)
/// - `GET /api/v1/videos/categories` - Category tabs
/// - `POST /api/v1/admin/videos/refresh` - Forced refetch (bearer token)
/// - `/api/v1/health*`, `/metrics` - Probes and Prometheus metrics
///
/// # Deployment
///
/// Runs on port 8081 (configurable via CONTENT_SERVICE_PORT env var).
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    // Support container healthchecks via CLI subcommand: `healthcheck-http` or legacy `healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" || cmd == "healthcheck-http" {
                let port = std::env::var("CONTENT_SERVICE_PORT").unwrap_or_else(|_| "8081".into());
                let url = format!("http://127.0.0.1:{}/api/v1/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    init_tracing();

    // Load configuration
    let config = match content_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting content-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    if config.youtube.api_key.is_empty() {
        tracing::warn!("YOUTUBE_API_KEY not set; upstream calls will be rejected");
    }
    if config.admin.api_token.is_none() {
        tracing::warn!("ADMIN_API_TOKEN not set; admin routes are disabled");
    }

    let cache = build_cache(&config).await?;

    let youtube = YouTubeClient::new(
        &config.youtube.base_url,
        &config.youtube.api_key,
        config.youtube.request_timeout(),
    )
    .map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to build video platform client: {e}"),
        )
    })?;

    let channel = ChannelRef::parse(&config.youtube.channel);
    tracing::info!(channel = ?channel, "Video catalog channel configured");

    let catalog = Arc::new(VideoCatalogService::new(
        Arc::new(youtube),
        cache.clone(),
        Arc::new(SystemClock),
        channel,
        config.catalog.freshness_window(),
    ));

    let video_state = web::Data::new(VideoHandlerState {
        catalog,
        default_limit: config.catalog.default_limit,
    });
    let health_state = web::Data::new(HealthState::new(cache));
    let admin_auth = web::Data::new(AdminAuth::new(config.admin.api_token.clone()));

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(video_state.clone())
            .app_data(health_state.clone())
            .app_data(admin_auth.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .workers(4)
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    server_handle.stop(true).await;

    let result = match server_task.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
    };

    tracing::info!("Content-service shutting down");
    result
}
