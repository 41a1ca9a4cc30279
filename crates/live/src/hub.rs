//! LiveHub - the broadcast point for live record events
//!
//! `LiveHub` sits between the ingestion path and connected push-channel
//! peers. It provides:
//!
//! - Zero cost when no subscribers (inline check)
//! - Independent per-subscriber delivery (bounded channels, `try_send`)
//! - Automatic cleanup of disconnected subscribers
//!
//! # Usage
//!
//! ```ignore
//! let hub = Arc::new(LiveHub::new());
//! hub.spawn_maintenance();
//!
//! // In the write path:
//! hub.publish(RecordEvent::RecordCreated(reading));  // no-op without subscribers
//!
//! // For new connections:
//! let (id, rx) = hub.subscribe()?;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::error::Result;
use crate::event::RecordEvent;
use crate::subscriber::SubscriberManager;

/// Interval for cleanup of disconnected subscribers
const CLEANUP_INTERVAL: Duration = Duration::from_secs(5);

/// The broadcast hub for live record events
#[derive(Debug, Default)]
pub struct LiveHub {
    /// Subscriber manager
    subscribers: SubscriberManager,
    /// Quick check flag for the publish path
    has_subscribers: AtomicBool,
    /// Total events published
    published: AtomicU64,
    /// Total events delivered to subscribers
    delivered: AtomicU64,
}

impl LiveHub {
    /// Create a new hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to every currently connected subscriber
    ///
    /// This sits on the write path - must be fast. The inline check ensures
    /// zero cost when no one is listening. Events published before a
    /// subscriber connects are never replayed to it.
    pub fn publish(&self, event: RecordEvent) {
        if !self.has_subscribers.load(Ordering::Relaxed) {
            return;
        }

        self.published.fetch_add(1, Ordering::Relaxed);

        let sent = self.subscribers.broadcast(Arc::new(event));
        if sent > 0 {
            self.delivered.fetch_add(sent as u64, Ordering::Relaxed);
            trace!(sent, "published record event to subscribers");
        }
    }

    /// Subscribe to the hub
    ///
    /// Returns the subscriber ID and a receiver channel for events.
    pub fn subscribe(&self) -> Result<(u64, mpsc::Receiver<Arc<RecordEvent>>)> {
        let (id, receiver) = self.subscribers.subscribe()?;

        self.has_subscribers.store(true, Ordering::Relaxed);

        debug!(id, "new live subscriber");
        Ok((id, receiver))
    }

    /// Unsubscribe from the hub
    pub fn unsubscribe(&self, id: u64) -> Result<()> {
        self.subscribers.unsubscribe(id)?;

        if !self.subscribers.has_subscribers() {
            self.has_subscribers.store(false, Ordering::Relaxed);
        }

        debug!(id, "live subscriber removed");
        Ok(())
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.count()
    }

    /// Check if there are any subscribers
    #[inline]
    pub fn has_subscribers(&self) -> bool {
        self.has_subscribers.load(Ordering::Relaxed)
    }

    /// Get hub statistics
    pub fn stats(&self) -> HubStats {
        HubStats {
            published: self.published.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            subscriber_count: self.subscribers.count(),
        }
    }

    /// Clean up disconnected subscribers
    ///
    /// Called periodically by the maintenance task.
    pub fn cleanup(&self) -> usize {
        let removed = self.subscribers.cleanup_disconnected();

        if removed > 0 {
            debug!(removed, "cleaned up disconnected subscribers");

            if !self.subscribers.has_subscribers() {
                self.has_subscribers.store(false, Ordering::Relaxed);
            }
        }

        removed
    }

    /// Spawn the maintenance task that sweeps disconnected subscribers
    pub fn spawn_maintenance(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let hub = Arc::clone(self);

        tokio::spawn(async move {
            let mut cleanup_interval = tokio::time::interval(CLEANUP_INTERVAL);

            loop {
                cleanup_interval.tick().await;
                hub.cleanup();
            }
        })
    }
}

/// Statistics about the hub
#[derive(Debug, Clone, Copy)]
pub struct HubStats {
    /// Total events that entered the hub with subscribers present
    pub published: u64,
    /// Total events delivered to subscribers
    pub delivered: u64,
    /// Current number of subscribers
    pub subscriber_count: usize,
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
