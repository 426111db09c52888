//! Route definitions for the DietCue HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/plans", post(handlers::ingest_plan))
        .route("/events", post(handlers::notify_event))
        .route("/devices/{identity}/token", put(handlers::register_token))
        .route("/owners/{owner_id}/reminders", get(handlers::list_reminders))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
