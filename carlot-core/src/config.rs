use std::env;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CarlotError, Result};

/// Env var naming an alternative config file
pub const CONFIG_ENV: &str = "CARLOT_CONFIG";

/// Config file looked up in the working directory when nothing else is named
pub const DEFAULT_CONFIG_FILE: &str = "carlot.toml";

/// Where the connection descriptor is mounted in the deployment
pub const DEFAULT_CREDENTIALS_PATH: &str = "/secrets/connection.txt";

/// Service configuration, loaded from `carlot.toml`.
///
/// Every section is optional; a missing key takes the default listed on the
/// field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarlotConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Listen address (default: 0.0.0.0:3000)
    pub bind: SocketAddr,
    /// Allow any CORS origin
    pub cors_permissive: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// File holding the connection string (default: /secrets/connection.txt)
    pub credentials_path: PathBuf,
    /// Require TLS but skip certificate verification.
    ///
    /// Needed for databases presenting self-signed certificates.
    pub accept_invalid_certs: bool,
    pub max_connections: u32,
    /// How long a query may wait for a free connection
    pub acquire_timeout_secs: u64,
    /// Upper bound on building the pool; unbounded when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_timeout_secs: Option<u64>,
    /// Upper bound on a single query; unbounded when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_timeout_secs: Option<u64>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            accept_invalid_certs: false,
            max_connections: 10,
            acquire_timeout_secs: 30,
            init_timeout_secs: None,
            query_timeout_secs: None,
        }
    }
}

impl DatabaseSection {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn init_timeout(&self) -> Option<Duration> {
        self.init_timeout_secs.map(Duration::from_secs)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Also append log lines to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Filter directive used when RUST_LOG is unset (e.g. "info,sqlx=warn")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl CarlotConfig {
    /// Resolve which config file to read: explicit path, then
    /// `$CARLOT_CONFIG`, then `./carlot.toml`.
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load and validate the config.
    ///
    /// A named file (argument or env var) must exist. The implicit
    /// `./carlot.toml` may be absent, in which case defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit.is_some() || env::var_os(CONFIG_ENV).is_some();
        let path = Self::config_path(explicit);

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content, &path),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !named => Ok(Self::default()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(CarlotError::ConfigNotFound { path })
            }
            Err(source) => Err(CarlotError::ConfigRead { path, source }),
        }
    }

    /// Parse config from TOML text and validate it
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_toml_str(content, Path::new("<inline>"))
    }

    fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|source| CarlotError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        let db = &self.database;
        if db.max_connections == 0 {
            return Err(CarlotError::invalid_config(
                "database.max_connections must be at least 1",
            ));
        }
        if db.acquire_timeout_secs == 0 {
            return Err(CarlotError::invalid_config(
                "database.acquire_timeout_secs must be at least 1",
            ));
        }
        if db.init_timeout_secs == Some(0) || db.query_timeout_secs == Some(0) {
            return Err(CarlotError::invalid_config(
                "database timeouts must be at least 1 second when set",
            ));
        }
        if db.credentials_path.as_os_str().is_empty() {
            return Err(CarlotError::invalid_config(
                "database.credentials_path must not be empty",
            ));
        }
        Ok(())
    }

    /// Render the effective config as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
