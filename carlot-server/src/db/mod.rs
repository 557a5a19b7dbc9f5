//! Database layer - lazy connection pool, car queries, outcome mapping
//!
//! # Design Principles
//!
//! - The pool is built on first use, never at startup, and never torn down
//! - Every query aggregates rows server-side (`json_agg`) into one column
//! - Driver errors are carried as text, verbatim, up to the HTTP layer

pub mod gateway;
pub mod pool;
pub mod store;

pub use gateway::{QueryGateway, QueryOutcome};
pub use pool::{ConnectionPool, PgConnector, PoolError, PoolSettings, StoreConnector};
pub use store::{CarQuery, CarStore, PgCarStore};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Failure reported by a non-sqlx store
    #[error("{0}")]
    Backend(String),
}

impl DbError {
    /// The driver's own diagnostic text, without our prefix.
    ///
    /// Server-side errors carry the Postgres message
    /// (`relation "cars" does not exist`); everything else uses the
    /// driver's display text.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Sqlx(sqlx::Error::Database(err)) => err.message().to_string(),
            Self::Sqlx(err) => err.to_string(),
            Self::Backend(message) => message.clone(),
        }
    }
}
