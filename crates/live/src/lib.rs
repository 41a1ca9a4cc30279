//! Sonda Live - broadcast fan-out for stored readings
//!
//! This crate fans newly stored and deleted readings out to every currently
//! connected subscriber:
//!
//! - Zero cost when no subscribers are connected (inline check)
//! - Per-subscriber bounded channels; a slow subscriber never blocks another
//! - No replay and no durable log: subscribers connecting after an event was
//!   emitted never receive it
//! - Auto-cleans subscribers on disconnect
//!
//! # Architecture
//!
//! ```text
//! Create / Delete handler
//!     │
//!     ▼
//! LiveHub.publish(event)
//!     │
//!     ▼
//! Subscribers (per-client channels)
//!     │
//!     ▼
//! Push-channel peers (WebSocket)
//! ```

mod error;
pub mod event;
pub mod hub;
pub mod subscriber;

pub use error::LiveError;
pub use event::RecordEvent;
pub use hub::{HubStats, LiveHub};
pub use subscriber::{Subscriber, SubscriberManager};
