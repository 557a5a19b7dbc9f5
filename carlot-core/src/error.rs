/// Structured error types for carlot-core.
///
/// The binary (carlot-cli) wraps these with `anyhow` context; library
/// consumers get the structured variants.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for carlot-core operations
#[derive(Error, Debug)]
pub enum CarlotError {
    /// Config file could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    /// Config file is not valid TOML for the expected shape
    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be rendered back to TOML
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Explicitly requested config file does not exist
    #[error("Config not found at {path:?}")]
    ConfigNotFound { path: PathBuf },

    /// Config parsed but holds an unusable value
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Result type alias for carlot-core operations
pub type Result<T> = std::result::Result<T, CarlotError>;

impl CarlotError {
    /// Create an invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
