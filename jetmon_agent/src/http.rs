//! HTTP routes. Serves the cached snapshot JSON quickly.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::sampler::refresh_cache;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    // Serve the cached JSON; if empty (cold start), collect once.
    let cached = state.last_json.read().await.clone();
    let body = if !cached.is_empty() {
        cached
    } else {
        match refresh_cache(&state).await {
            Some(js) => js,
            None => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    };
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
