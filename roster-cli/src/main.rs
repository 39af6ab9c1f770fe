//! roster CLI - student and teacher record service
//!
//! - `serve`: run the HTTP API (connect with retry, ensure tables, listen)
//! - `check-db`: connect and ensure tables, then exit (readiness probes)
//!
//! A `.env` file in the working directory is loaded before arguments are
//! parsed; variables already set in the environment win.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    author,
    version,
    about = "Student and teacher record service backed by Postgres"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Connect to the database and ensure tables exist, then exit
    CheckDb(commands::check_db::CheckDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::CheckDb(args) => commands::run_check_db(args).await?,
    }
    Ok(())
}
