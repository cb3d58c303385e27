//! Horarios API Server implementation
//!
//! HTTP server using Axum. Hosts the parse endpoint the upload form posts to,
//! plus read-only access to the last parsed schedule, its view and exports.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::cache::{FileCache, MemoryCache, ScheduleCache};
use crate::normalizer::PREFERRED_SHEET;
use crate::workbook::{ParserConfig, WorkbookParser};

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a multipart upload, in bytes
    pub max_upload_bytes: usize,
    pub preferred_sheet: String,
    /// Persist the last parse here; in-memory when `None`
    pub cache_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 10 * 1024 * 1024,
            preferred_sheet: PREFERRED_SHEET.to_string(),
            cache_file: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub parser: WorkbookParser,
    pub cache: Arc<dyn ScheduleCache>,
}

impl AppState {
    pub fn new(parser: WorkbookParser, cache: Arc<dyn ScheduleCache>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            parser,
            cache,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        let cache: Arc<dyn ScheduleCache> = match &config.cache_file {
            Some(path) => Arc::new(FileCache::new(path)),
            None => Arc::new(MemoryCache::new()),
        };
        let parser = WorkbookParser::new(ParserConfig {
            preferred_sheet: config.preferred_sheet.clone(),
        });
        Self::new(parser, cache)
    }
}

/// Build the router; separated from [`run_api_server`] so tests can drive it directly
pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Schedule endpoints
        .route("/api/parse-horarios", post(handlers::parse_horarios))
        .route("/api/horarios", get(handlers::get_horarios))
        .route("/api/horarios/view", get(handlers::view))
        .route("/api/export/json", get(handlers::export_json))
        .route("/api/export/csv", get(handlers::export_csv))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horarios=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state, config.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Horarios API Server starting on http://{}", addr);
    info!("   Upload: POST /api/parse-horarios (multipart field 'file')");
    info!(
        "   Preferred sheet: '{}', cache: {}",
        config.preferred_sheet,
        config
            .cache_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "in-memory".to_string())
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Horarios API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.preferred_sheet, "OPS FEB");
        assert!(config.cache_file.is_none());
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            ..ApiConfig::default()
        };
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn test_app_state_from_config_uses_preferred_sheet() {
        let config = ApiConfig {
            preferred_sheet: "Marzo".to_string(),
            ..ApiConfig::default()
        };
        let state = AppState::from_config(&config);
        assert_eq!(state.parser.config().preferred_sheet, "Marzo");
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.cache.load().unwrap().is_none());
    }
}
