//! Database connection pool management
//!
//! The pool is created lazily by the first request that needs it and then
//! shared for the life of the process. Creation reads the connection
//! descriptor from the [`CredentialSource`]; if that fails nothing is stored
//! and the next request tries again from scratch.
//!
//! Concurrent first requests share one initialization: whoever gets there
//! first builds the pool, the rest wait for it.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use carlot_core::DatabaseSection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tokio::sync::OnceCell;

use super::store::{CarStore, PgCarStore};
use super::DbError;
use crate::credentials::{ConnectionDescriptor, CredentialError, CredentialSource};

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// sqlx's own default for waiting on a free connection
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool construction settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Require TLS without verifying the server certificate.
    ///
    /// When false the certificate chain and host name are verified.
    pub accept_invalid_certs: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

impl From<&DatabaseSection> for PoolSettings {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            max_connections: section.max_connections,
            acquire_timeout: section.acquire_timeout(),
            accept_invalid_certs: section.accept_invalid_certs,
        }
    }
}

/// Turns a connection descriptor into a usable store
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, descriptor: &ConnectionDescriptor)
        -> Result<Arc<dyn CarStore>, DbError>;
}

/// Builds sqlx Postgres pools.
///
/// Pools are created lazily: no connection is opened until the first query
/// checks one out, so an unreachable server shows up as a query error.
#[derive(Debug, Clone, Default)]
pub struct PgConnector {
    settings: PoolSettings,
}

impl PgConnector {
    pub fn new(settings: PoolSettings) -> Self {
        Self { settings }
    }

    /// Parse the descriptor and apply the TLS policy
    pub fn connect_options(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<PgConnectOptions, DbError> {
        let options = PgConnectOptions::from_str(descriptor.as_str())?;
        let ssl_mode = if self.settings.accept_invalid_certs {
            PgSslMode::Require
        } else {
            PgSslMode::VerifyFull
        };
        Ok(options.ssl_mode(ssl_mode))
    }

    pub fn build_pool(&self, descriptor: &ConnectionDescriptor) -> Result<PgPool, DbError> {
        let options = self.connect_options(descriptor)?;
        Ok(PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_lazy_with(options))
    }
}

#[async_trait]
impl StoreConnector for PgConnector {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn CarStore>, DbError> {
        let pool = self.build_pool(descriptor)?;
        if self.settings.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for database connections");
        }
        Ok(Arc::new(PgCarStore::new(pool)))
    }
}

/// Why the pool could not be made available
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error(transparent)]
    CredentialsUnavailable(#[from] CredentialError),

    #[error("failed to create connection pool: {0}")]
    Init(DbError),

    #[error("connection pool creation timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

/// Lazily created, process-wide store handle.
///
/// Moves from absent to present exactly once and never back.
pub struct ConnectionPool {
    credentials: Arc<dyn CredentialSource>,
    connector: Arc<dyn StoreConnector>,
    init_timeout: Option<Duration>,
    handle: OnceCell<Arc<dyn CarStore>>,
}

impl ConnectionPool {
    pub fn new(
        credentials: Arc<dyn CredentialSource>,
        connector: Arc<dyn StoreConnector>,
    ) -> Self {
        Self {
            credentials,
            connector,
            init_timeout: None,
            handle: OnceCell::new(),
        }
    }

    /// Bound pool creation; `None` waits indefinitely
    pub fn with_init_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.init_timeout = timeout;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }

    /// Return the shared store, creating it first if needed.
    pub async fn ensure(&self) -> Result<Arc<dyn CarStore>, PoolError> {
        if let Some(handle) = self.handle.get() {
            return Ok(Arc::clone(handle));
        }

        let init = self.handle.get_or_try_init(|| self.create());
        let handle = match self.init_timeout {
            Some(limit) => tokio::time::timeout(limit, init)
                .await
                .map_err(|_| PoolError::TimedOut(limit))??,
            None => init.await?,
        };
        Ok(Arc::clone(handle))
    }

    async fn create(&self) -> Result<Arc<dyn CarStore>, PoolError> {
        let descriptor = self.credentials.load().await?;
        let store = self
            .connector
            .connect(&descriptor)
            .await
            .map_err(PoolError::Init)?;
        tracing::info!("connection pool created");
        Ok(store)
    }
}
