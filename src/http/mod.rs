//! Axum router: the `/chat` route plus CORS and request tracing layers.

pub mod chat;
pub mod error;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(chat::router())
        .layer(cors_layer(state.config.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin unless `origins` lists at least one valid origin (comma separated).
pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .filter(|v: &HeaderValue| !v.is_empty())
        .collect();

    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if allowed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(allowed)
    }
}
