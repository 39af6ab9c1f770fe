//! Startup and shutdown sequencing
//!
//! `Starting -> PoolReady -> SchemaReady -> Serving -> Draining -> Stopped`
//!
//! The lifecycle is the single owner of the pool: it creates it, hands clones
//! to the HTTP layer, and closes it once shutdown has been signalled. Any
//! startup failure goes straight to `Stopped`.

use std::fmt;
use std::future::Future;

use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::db::{
    acquire_pool, ensure_schema, ConnectionError, PoolSettings, RetryPolicy, SchemaError, StoreConfig,
};
use crate::http::{run_server, ServeError, ServerConfig};

/// Where the service is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    PoolReady,
    SchemaReady,
    Serving,
    Draining,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "starting",
            Self::PoolReady => "pool-ready",
            Self::SchemaReady => "schema-ready",
            Self::Serving => "serving",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Everything needed to bring the service up.
#[derive(Debug, Clone, Default)]
pub struct LifecycleConfig {
    pub store: StoreConfig,
    pub pool: PoolSettings,
    pub retry: RetryPolicy,
    pub server: ServerConfig,
}

/// Fatal startup or serving failure.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Serve(#[from] ServeError),
}

/// Drives the service through its phases.
pub struct Lifecycle {
    config: LifecycleConfig,
    phase: watch::Sender<Phase>,
}

impl Lifecycle {
    pub fn new(config: LifecycleConfig) -> Self {
        let (phase, _) = watch::channel(Phase::Starting);
        Self { config, phase }
    }

    /// Observe phase transitions.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    fn enter(&self, phase: Phase) {
        tracing::info!(%phase, "lifecycle");
        self.phase.send_replace(phase);
    }

    /// Connect and provision tables. On success the caller owns the pool.
    pub async fn prepare(&self) -> Result<PgPool, LifecycleError> {
        self.enter(Phase::Starting);

        let pool = match acquire_pool(&self.config.store, self.config.pool, self.config.retry).await {
            Ok(pool) => pool,
            Err(err) => {
                self.enter(Phase::Stopped);
                return Err(err.into());
            }
        };
        self.enter(Phase::PoolReady);

        if let Err(err) = ensure_schema(&pool).await {
            pool.close().await;
            self.enter(Phase::Stopped);
            return Err(err.into());
        }
        self.enter(Phase::SchemaReady);

        Ok(pool)
    }

    /// Run to completion: prepare, serve until `shutdown` resolves, then
    /// close the pool.
    pub async fn run<F>(self, shutdown: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let pool = self.prepare().await?;

        let bind_addr = self.config.server.bind_addr;
        let listener = match TcpListener::bind(bind_addr).await {
            Ok(listener) => listener,
            Err(source) => {
                pool.close().await;
                self.enter(Phase::Stopped);
                return Err(ServeError::Bind {
                    addr: bind_addr,
                    source,
                }
                .into());
            }
        };
        self.enter(Phase::Serving);

        let phase = self.phase.clone();
        let draining = async move {
            shutdown.await;
            tracing::info!(phase = %Phase::Draining, "lifecycle");
            phase.send_replace(Phase::Draining);
        };

        let served = run_server(listener, pool.clone(), &self.config.server, draining).await;

        // Requests still holding a connection past this point fail with a store error
        pool.close().await;
        tracing::info!("Database pool closed");
        self.enter(Phase::Stopped);

        served.map_err(Into::into)
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_config() -> LifecycleConfig {
        LifecycleConfig {
            store: StoreConfig {
                host: Some("127.0.0.1".into()),
                port: Some(1),
                user: Some("roster".into()),
                password: None,
                database: Some("roster".into()),
            },
            pool: PoolSettings {
                max_connections: 1,
                acquire_timeout: Duration::from_millis(100),
                connect_timeout: Duration::from_millis(500),
            },
            retry: RetryPolicy::new(2, Duration::from_millis(10)),
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".parse().unwrap(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::SchemaReady.to_string(), "schema-ready");
        assert_eq!(Phase::Stopped.to_string(), "stopped");
    }

    #[tokio::test]
    async fn unreachable_store_never_serves() {
        let lifecycle = Lifecycle::new(unreachable_config());
        let mut phases = lifecycle.subscribe();

        let watcher = tokio::spawn(async move {
            let mut seen = Vec::new();
            while phases.changed().await.is_ok() {
                seen.push(*phases.borrow_and_update());
            }
            seen
        });

        // The shutdown future never fires: reaching Serving would hang here
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            lifecycle.run(std::future::pending::<()>()),
        )
        .await
        .expect("startup must fail, not serve");

        match result {
            Err(LifecycleError::Connection(err)) => assert_eq!(err.attempts, 2),
            other => panic!("expected connection error, got {other:?}"),
        }

        let seen = watcher.await.unwrap();
        assert!(!seen.contains(&Phase::Serving));
        assert_eq!(seen.last(), Some(&Phase::Stopped));
    }

    #[tokio::test]
    async fn missing_settings_fail_like_unreachable() {
        let lifecycle = Lifecycle::new(LifecycleConfig {
            store: StoreConfig::default(),
            ..unreachable_config()
        });

        let err = lifecycle.prepare().await.unwrap_err();
        assert!(matches!(err, LifecycleError::Connection(_)));
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }

    // Integration test - run with DB_HOST, DB_USER, DB_PASSWORD, DB_NAME set
    // cargo test -p roster-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn serves_then_drains_and_stops() {
        let config = LifecycleConfig {
            store: StoreConfig::from_env(),
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".parse().unwrap(),
                ..Default::default()
            },
            ..Default::default()
        };
        let lifecycle = Lifecycle::new(config);
        let mut phases = lifecycle.subscribe();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let running = tokio::spawn(lifecycle.run(async move {
            let _ = stop_rx.await;
        }));

        phases.wait_for(|p| *p == Phase::Serving).await.unwrap();
        stop_tx.send(()).unwrap();

        running.await.unwrap().expect("clean exit");
        assert_eq!(*phases.borrow(), Phase::Stopped);
    }
}
