//! Axum server setup
//!
//! Server skeleton with:
//! - All routes under `/api`
//! - CORS (any origin unless an allow-list is configured)
//! - Tracing middleware
//! - Graceful shutdown driven by a caller-supplied future

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::repos::{Student, Teacher};

/// Default listen address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
    3500,
);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3500)
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND,
            allowed_origins: Vec::new(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, ServeError> {
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| ServeError::InvalidOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .merge(routes::health::router())
        .merge(routes::records::router::<Student>())
        .merge(routes::records::router::<Teacher>());

    Ok(Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state)))
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// In-flight requests are allowed to finish; the pool is left open for the
/// caller to close.
///
/// # Example
///
/// ```ignore
/// let listener = TcpListener::bind(config.bind_addr).await?;
/// run_server(listener, pool, &config, shutdown_signal()).await?;
/// ```
pub async fn run_server<F>(
    listener: TcpListener,
    pool: PgPool,
    config: &ServerConfig,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState::new(pool), config)?;

    if config.allowed_origins.is_empty() {
        tracing::warn!("CORS: no allow-list configured - all origins allowed");
    }
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped accepting requests");
    Ok(())
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://roster@127.0.0.1:1/roster")
            .expect("valid url")
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3500);
        assert!(config.bind_addr.ip().is_unspecified());
        assert!(config.allowed_origins.is_empty());
    }

    #[tokio::test]
    async fn rejects_unparseable_origin() {
        let config = ServerConfig {
            allowed_origins: vec!["http://ok.example".into(), "bad\norigin".into()],
            ..Default::default()
        };
        let err = build_router(AppState::new(lazy_pool()), &config).unwrap_err();
        assert!(matches!(err, ServeError::InvalidOrigin(o) if o == "bad\norigin"));
    }

    #[tokio::test]
    async fn stops_when_shutdown_resolves() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig::default();

        // Already-resolved shutdown: serve returns right away
        run_server(listener, lazy_pool(), &config, async {})
            .await
            .expect("clean shutdown");
    }
}
