//! Tracing setup for the carlot CLI
//!
//! Console output always; optionally a second, plain-text copy appended to a
//! log file.
//!
//! Usage:
//!   carlot --debug serve             # Debug logging to console
//!   RUST_LOG=carlot_server=debug     # Fine-grained log control
//!
//! Filter precedence: `--debug`, then `RUST_LOG`, then `logging.level` from
//! the config file, then `info`.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging regardless of RUST_LOG
    pub debug: bool,
    /// Filter used when RUST_LOG is not set
    pub level: Option<String>,
    /// Append logs to this file as well as the console
    pub file: Option<PathBuf>,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        if self.debug {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.level.as_deref().unwrap_or("info"))
        })
    }
}

/// Initialize tracing.
///
/// The returned guard flushes the log file on drop and must be held for the
/// life of the process.
pub fn init(config: &TracingConfig) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer().with_target(config.debug).compact();

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let appender = file_appender(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    Ok(guard)
}

/// Single file, appended to, never rotated
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
