//! HTTP server command for the cars API
//!
//! Loads the config, applies command-line overrides and runs the server.
//! Nothing touches the database here; the pool is built on first use.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use carlot_core::CarlotConfig;
use clap::Parser;

use carlot_server::http::{run_server, ServerConfig};
use carlot_server::AppState;

use crate::tracing_setup::{self, TracingConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:3000)
    #[arg(long, short = 'b', env = "CARLOT_BIND")]
    pub bind: Option<SocketAddr>,

    /// File holding the Postgres connection string
    #[arg(long, env = "CARLOT_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Use TLS without verifying the database certificate
    #[arg(long)]
    pub accept_invalid_certs: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    /// Fold command-line values over the loaded config
    pub fn apply(&self, config: &mut CarlotConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(path) = &self.credentials {
            config.database.credentials_path = path.clone();
        }
        if self.accept_invalid_certs {
            config.database.accept_invalid_certs = true;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<PathBuf>, debug: bool) -> Result<()> {
    let mut config = CarlotConfig::load(config_path.as_deref())
        .context("Failed to load carlot config")?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let _log_guard = tracing_setup::init(&TracingConfig {
        debug,
        level: config.logging.level.clone(),
        file: config.logging.file.clone(),
    })?;

    tracing::info!(
        bind = %config.server.bind,
        credentials = %config.database.credentials_path.display(),
        "Starting carlot server"
    );

    let state = AppState::from_config(&config.database).context("Failed to set up metrics")?;

    run_server(state, ServerConfig::from(&config.server))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let mut config = CarlotConfig::default();
        let args = ServeArgs {
            bind: Some("127.0.0.1:8080".parse().unwrap()),
            credentials: Some("/run/secrets/db".into()),
            accept_invalid_certs: true,
            cors_permissive: false,
        };

        args.apply(&mut config);

        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.database.credentials_path, PathBuf::from("/run/secrets/db"));
        assert!(config.database.accept_invalid_certs);
        assert!(!config.server.cors_permissive);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let mut config = CarlotConfig::parse("[database]\naccept_invalid_certs = true\n").unwrap();
        ServeArgs::default().apply(&mut config);
        assert!(config.database.accept_invalid_certs);
        assert_eq!(config.server.bind.port(), 3000);
    }
}
