//! API error types with IntoResponse
//!
//! Error bodies are plain text. Database failures pass the driver's
//! diagnostic through unchanged so operators can see what went wrong.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::{PoolError, QueryOutcome};
use crate::metrics::MetricsError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Lookup matched nothing (404)
    NotFound,

    /// Pool could not be created yet (503)
    Unavailable(PoolError),

    /// Query failed after the pool was available (500, driver text)
    Database { message: String },

    /// Pool creation or query exceeded its deadline (504)
    Timeout { limit: Duration },

    /// Metrics could not be rendered (500)
    Metrics(MetricsError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            Self::Unavailable(err) => {
                tracing::warn!(error = %err, "database not ready");
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            Self::Database { message } => {
                tracing::error!(error = %message, "car query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            Self::Timeout { limit } => {
                tracing::error!(limit_secs = limit.as_secs(), "database deadline exceeded");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("operation timed out after {} seconds", limit.as_secs()),
                )
            }
            Self::Metrics(err) => {
                tracing::error!("Metrics error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, body).into_response()
    }
}

impl From<PoolError> for ApiError {
    fn from(e: PoolError) -> Self {
        match e {
            PoolError::TimedOut(limit) => Self::Timeout { limit },
            _ => Self::Unavailable(e),
        }
    }
}

impl From<MetricsError> for ApiError {
    fn from(e: MetricsError) -> Self {
        Self::Metrics(e)
    }
}

impl ApiError {
    /// Map a non-row query outcome; `Rows` has no error form
    pub fn from_outcome(outcome: QueryOutcome) -> Option<Self> {
        match outcome {
            QueryOutcome::Rows(_) => None,
            QueryOutcome::NotFound => Some(Self::NotFound),
            QueryOutcome::Error(message) => Some(Self::Database { message }),
            QueryOutcome::TimedOut(limit) => Some(Self::Timeout { limit }),
        }
    }
}
