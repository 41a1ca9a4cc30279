//! API routes
//!
//! Domain-grouped HTTP route handlers.

pub mod live;
pub mod ops;
pub mod readings;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Operations routes (health - no auth)
        .merge(ops::routes())
        // Readings CRUD + search
        .nest("/api/v1/readings", readings::routes())
        // WebSocket push channel
        .merge(live::routes())
        .with_state(state)
}
