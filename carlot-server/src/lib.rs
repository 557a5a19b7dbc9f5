//! carlot-server: read-only cars API
//!
//! Serves car lookups from Postgres through a connection pool that is
//! created by the first request needing it, plus Prometheus metrics,
//! a health probe and OpenAPI docs.

pub mod credentials;
pub mod db;
pub mod http;
pub mod metrics;
pub mod state;

#[cfg(test)]
mod test_support;

pub use credentials::{ConnectionDescriptor, CredentialError, CredentialSource, FileCredentialSource};
pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
pub use metrics::{Metrics, MetricsError};
pub use state::AppState;
