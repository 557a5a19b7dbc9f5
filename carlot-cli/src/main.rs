//! carlot CLI - read-only cars API
//!
//! Entry point for the `carlot` binary:
//! - `serve` runs the HTTP server (car lookups, metrics, docs)
//! - `config` inspects and validates `carlot.toml`

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "carlot",
    author,
    version,
    about = "Read-only cars API backed by Postgres",
    long_about = "Serve car listings, lookups by id and prices by name from a Postgres table. \
                  The database connection is opened lazily from a mounted credentials file."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: $CARLOT_CONFIG or ./carlot.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Inspect carlot configuration (path, show, validate)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, cli.config, cli.debug).await?,
        Commands::Config(args) => {
            tracing_setup::init(&tracing_setup::TracingConfig {
                debug: cli.debug,
                ..Default::default()
            })
            .ok();
            config::run_config(args, cli.config.as_deref())?
        }
    }
    Ok(())
}
