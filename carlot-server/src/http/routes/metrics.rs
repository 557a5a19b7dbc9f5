//! Prometheus scrape endpoint

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::http::error::ApiError;
use crate::metrics::CONTENT_TYPE;
use crate::state::AppState;

/// GET /metrics
async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.metrics().render()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics))
}
