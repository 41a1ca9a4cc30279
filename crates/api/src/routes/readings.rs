//! Reading endpoints
//!
//! CRUD and search endpoints for the readings collection.
//!
//! | Endpoint | Success | Failure |
//! |----------|---------|---------|
//! | `GET /readings` | 200 + array | 500 store error |
//! | `GET /readings/{id}` | 200 + object | 404 missing, 500 store error |
//! | `GET /readings/search` | 200 + array | 500 store error |
//! | `POST /readings` | 201 + stored object | 400 invalid/persist failure |
//! | `PUT /readings/{id}` | 200 + updated object | 404 missing, 400 persist failure |
//! | `DELETE /readings/{id}` | 200 + confirmation | 404 missing, 500 store error |
//!
//! Creation and deletion publish a live event; updates do not.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

use sonda_live::RecordEvent;
use sonda_store::{NewReading, Reading, StoreError};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request/Response types
// =============================================================================

/// Search query parameters
///
/// An absent parameter leaves that field unfiltered; a present-but-empty
/// parameter filters for the empty string. Matching is exact equality -
/// substring filtering is a consumer-side concern.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub kind: Option<String>,
    pub name: Option<String>,
}

/// Delete confirmation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

// =============================================================================
// Routes
// =============================================================================

/// Reading routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_readings))
        .route("/", post(create_reading))
        .route("/search", get(search_readings))
        .route("/{id}", get(get_reading))
        .route("/{id}", put(update_reading))
        .route("/{id}", delete(delete_reading))
}

// =============================================================================
// Handlers
// =============================================================================

/// List all readings
///
/// GET /api/v1/readings
async fn list_readings(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state.store.readings().list().await?;
    Ok(Json(readings))
}

/// Get a reading by id
///
/// GET /api/v1/readings/{id}
async fn get_reading(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Reading>, ApiError> {
    let reading = state
        .store
        .readings()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(&id))?;

    Ok(Json(reading))
}

/// Search readings by exact field equality
///
/// GET /api/v1/readings/search?kind={kind}&name={name}
async fn search_readings(
    Query(query): Query<SearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state
        .store
        .readings()
        .find(query.kind.as_deref(), query.name.as_deref())
        .await?;

    Ok(Json(readings))
}

/// Store a new reading and publish it to live subscribers
///
/// POST /api/v1/readings
async fn create_reading(
    State(state): State<AppState>,
    Json(payload): Json<NewReading>,
) -> Result<(StatusCode, Json<Reading>), ApiError> {
    let reading = state.store.readings().insert(payload).await.map_err(|e| {
        tracing::error!(error = %e, "failed to store reading");
        ApiError::InvalidInput
    })?;

    state
        .live
        .publish(RecordEvent::RecordCreated(reading.clone()));

    Ok((StatusCode::CREATED, Json(reading)))
}

/// Replace the reading at `id`, preserving its identity
///
/// PUT /api/v1/readings/{id}
async fn update_reading(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<NewReading>,
) -> Result<Json<Reading>, ApiError> {
    let reading = state
        .store
        .readings()
        .replace(&id, payload)
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => ApiError::not_found(&id),
            other => {
                tracing::error!(error = %other, "failed to update reading");
                ApiError::InvalidInput
            }
        })?;

    // Updates are not broadcast; only creation and deletion are live events.
    Ok(Json(reading))
}

/// Delete a reading and publish a deletion notice with its prior state
///
/// DELETE /api/v1/readings/{id}
async fn delete_reading(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.store.readings().delete(&id).await?;

    state.live.publish(RecordEvent::RecordDeleted(deleted));

    Ok(Json(DeleteResponse {
        message: "reading deleted",
    }))
}
