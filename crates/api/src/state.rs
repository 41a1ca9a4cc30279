//! Application state
//!
//! Shared state for API handlers: the record store and the live hub. Both
//! are passed in by the caller rather than reached through globals.

use std::sync::Arc;

use sonda_live::LiveHub;
use sonda_store::ReadingStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store
    pub store: Arc<ReadingStore>,
    /// Broadcast hub for live record events
    pub live: Arc<LiveHub>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<ReadingStore>, live: Arc<LiveHub>) -> Self {
        Self { store, live }
    }
}
