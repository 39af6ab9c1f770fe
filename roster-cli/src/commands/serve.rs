//! HTTP server command
//!
//! Connects to the store (with retry), ensures tables, then serves the record
//! API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use roster_server::{shutdown_signal, Lifecycle, LifecycleConfig, ServerConfig};

use super::StoreArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:3500)
    #[arg(long, short = 'b', env = "ROSTER_BIND", default_value = "0.0.0.0:3500")]
    pub bind: SocketAddr,

    /// Allowed CORS origin (repeatable). Without any, all origins are allowed.
    #[arg(long = "cors-origin", env = "ROSTER_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = LifecycleConfig {
        store: args.store.store_config(),
        pool: args.store.pool_settings(),
        retry: args.store.retry_policy(),
        server: ServerConfig {
            bind_addr: args.bind,
            allowed_origins: args.cors_origins,
        },
    };

    tracing::info!("Starting roster server on {}", config.server.bind_addr);

    // Run server (blocks until shutdown)
    Lifecycle::new(config)
        .run(shutdown_signal())
        .await
        .context("Server startup failed")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
