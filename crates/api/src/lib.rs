//! Sonda API
//!
//! HTTP and push-channel surface for the readings service.
//!
//! # Overview
//!
//! This crate provides the REST API for reading ingestion and queries,
//! built on Axum, plus the WebSocket push channel that fans live
//! create/delete events out to connected peers.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use sonda_api::{AppState, build_router};
//! use sonda_live::LiveHub;
//! use sonda_store::ReadingStore;
//!
//! let store = Arc::new(ReadingStore::open("data/readings.db").await?);
//! let live = Arc::new(LiveHub::new());
//! let app = build_router(AppState::new(store, live));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! - `GET /api/v1/readings` - List all readings
//! - `GET /api/v1/readings/{id}` - Get a reading by id
//! - `GET /api/v1/readings/search?kind=&name=` - Exact-match search
//! - `POST /api/v1/readings` - Store a new reading
//! - `PUT /api/v1/readings/{id}` - Replace a reading
//! - `DELETE /api/v1/readings/{id}` - Delete a reading
//! - `GET /api/v1/live` - WebSocket push channel
//! - `GET /health` - Health / status

pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::AppState;
