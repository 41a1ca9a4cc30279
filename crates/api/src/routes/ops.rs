//! Operations routes
//!
//! Health endpoint for monitoring. No authentication.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether the record store was reachable at startup
    pub store: &'static str,
    /// Currently connected live subscribers
    pub subscribers: usize,
}

/// Operations routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        store: if state.store.is_available() {
            "available"
        } else {
            "unavailable"
        },
        subscribers: state.live.subscriber_count(),
    })
}
