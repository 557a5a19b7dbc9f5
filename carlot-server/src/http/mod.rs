//! HTTP server layer
//!
//! Axum server with:
//! - Car lookups backed by the lazy pool
//! - Prometheus scrape, health and OpenAPI docs
//! - CORS, request tracing, graceful shutdown
//! - Plain-text error responses

pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig, ServerError};
