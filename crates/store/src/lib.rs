//! Sonda Record Store
//!
//! Turso-backed persistence for sensor/actuator readings.
//!
//! The store is a single collection of [`Reading`] documents keyed by a
//! store-assigned id. There are no transactions and no multi-record
//! atomicity; every operation is independently atomic at the single-record
//! level.
//!
//! # Usage
//!
//! ```ignore
//! use sonda_store::{NewReading, ReadingStore};
//!
//! // File-based (production)
//! let store = ReadingStore::open("data/readings.db").await?;
//!
//! // In-memory (testing)
//! let store = ReadingStore::open_memory().await?;
//!
//! let reading = store.readings().insert(NewReading::default()).await?;
//! let found = store.readings().get(&reading.id).await?;
//! ```
//!
//! # Availability
//!
//! The store is opened once at process start. When opening fails, the caller
//! can fall back to [`ReadingStore::unavailable`]: the process keeps running
//! and every operation returns [`StoreError::Unavailable`] until a restart
//! with a reachable database. No reconnect logic beyond that.

pub mod db;
pub mod error;
pub mod model;
pub mod repo;

// Re-exports
pub use db::ReadingStore;
pub use error::{Result, StoreError};
pub use model::{NewReading, Reading};
pub use repo::ReadingRepo;
