//! HTTP API module
//!
//! Endpoint handlers and response structures for presentation clients.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/skip", post(skip_handler))
        .route("/settings/open", post(open_settings_handler))
        .route("/settings/close", post(close_settings_handler))
        .route("/config", get(config_handler))
        .route("/config/:field", put(set_config_handler))
        .route("/config/:field/increment", post(increment_config_handler))
        .route("/config/:field/decrement", post(decrement_config_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
