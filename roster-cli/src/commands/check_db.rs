//! Readiness check: connect and ensure tables, then exit

use anyhow::{Context, Result};
use clap::Parser;

use roster_server::{Lifecycle, LifecycleConfig};

use super::StoreArgs;

#[derive(Parser, Debug)]
pub struct CheckDbArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run_check_db(args: CheckDbArgs) -> Result<()> {
    let lifecycle = Lifecycle::new(LifecycleConfig {
        store: args.store.store_config(),
        pool: args.store.pool_settings(),
        retry: args.store.retry_policy(),
        ..Default::default()
    });

    let pool = lifecycle
        .prepare()
        .await
        .context("Database not ready")?;
    pool.close().await;

    println!("database ready");
    Ok(())
}
