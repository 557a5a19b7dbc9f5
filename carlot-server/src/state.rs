//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;

use carlot_core::DatabaseSection;

use crate::credentials::FileCredentialSource;
use crate::db::{CarStore, ConnectionPool, PgConnector, PoolSettings, QueryGateway};
use crate::metrics::{Metrics, MetricsError};

/// Shared application state.
///
/// Built once at startup and cloned into every handler. The pool inside
/// starts out empty and is filled by the first car request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: ConnectionPool,
    metrics: Metrics,
    query_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(pool: ConnectionPool, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                metrics,
                query_timeout: None,
            }),
        }
    }

    /// Wire the Postgres pool, file credentials and metrics from config
    pub fn from_config(database: &DatabaseSection) -> Result<Self, MetricsError> {
        let credentials = Arc::new(FileCredentialSource::new(&database.credentials_path));
        let connector = Arc::new(PgConnector::new(PoolSettings::from(database)));
        let pool = ConnectionPool::new(credentials, connector)
            .with_init_timeout(database.init_timeout());

        Ok(Self::new(pool, Metrics::new()?).with_query_timeout(database.query_timeout()))
    }

    /// Only meaningful before the state is shared
    pub fn with_query_timeout(self, timeout: Option<Duration>) -> Self {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                inner.query_timeout = timeout;
                Self {
                    inner: Arc::new(inner),
                }
            }
            Err(inner) => Self { inner },
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.inner.pool
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    pub fn gateway<'a>(&self, store: &'a dyn CarStore) -> QueryGateway<'a> {
        QueryGateway::new(store).with_timeout(self.inner.query_timeout)
    }
}
