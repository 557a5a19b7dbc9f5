//! Response accounting middleware

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Count every response by its route template and status code.
///
/// Applied with `route_layer`, so only matched routes are counted and the
/// label is the template (`/car/{id}`), never the raw path.
pub async fn track_responses(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    state
        .metrics()
        .record_response(&route, response.status().as_u16());
    response
}
