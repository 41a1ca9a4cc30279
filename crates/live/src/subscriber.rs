//! Subscriber management for live connections
//!
//! Each connected peer gets a `Subscriber` instance: a unique ID plus a
//! bounded channel sender for async event delivery. The `SubscriberManager`
//! handles registration, removal, and fan-out. There is no per-subscriber
//! filtering: every subscriber receives every event.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::error::{LiveError, Result};
use crate::event::RecordEvent;

/// Counter for generating unique subscriber IDs
static SUBSCRIBER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Maximum number of concurrent subscribers
const MAX_SUBSCRIBERS: usize = 100;

/// Channel buffer size for subscriber events
const CHANNEL_BUFFER_SIZE: usize = 256;

/// A single live subscriber (connected peer)
#[derive(Debug)]
pub struct Subscriber {
    /// Unique identifier
    id: u64,
    /// Channel sender for event delivery
    sender: mpsc::Sender<Arc<RecordEvent>>,
}

impl Subscriber {
    /// Create a new subscriber
    pub fn new(sender: mpsc::Sender<Arc<RecordEvent>>) -> Self {
        Self {
            id: SUBSCRIBER_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
            sender,
        }
    }

    /// Get the subscriber ID
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Try to send an event to this subscriber
    ///
    /// Returns false if the channel is full or closed. Delivery to one
    /// subscriber never blocks on another; a saturated peer simply loses
    /// the event.
    #[inline]
    pub fn try_send(&self, event: Arc<RecordEvent>) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Check if this subscriber is still connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Manages all active subscribers
#[derive(Debug, Default)]
pub struct SubscriberManager {
    /// Active subscribers
    subscribers: RwLock<Vec<Arc<Subscriber>>>,
}

impl SubscriberManager {
    /// Create a new subscriber manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    ///
    /// Returns the subscriber ID and receiver channel
    pub fn subscribe(&self) -> Result<(u64, mpsc::Receiver<Arc<RecordEvent>>)> {
        let mut subscribers = self.subscribers.write();

        if subscribers.len() >= MAX_SUBSCRIBERS {
            return Err(LiveError::MaxSubscribers {
                max: MAX_SUBSCRIBERS,
            });
        }

        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let subscriber = Arc::new(Subscriber::new(sender));

        let id = subscriber.id();
        subscribers.push(subscriber);

        Ok((id, receiver))
    }

    /// Unsubscribe by ID
    pub fn unsubscribe(&self, id: u64) -> Result<()> {
        let mut subscribers = self.subscribers.write();
        let original_len = subscribers.len();
        subscribers.retain(|s| s.id() != id);

        if subscribers.len() == original_len {
            return Err(LiveError::SubscriberNotFound { id });
        }

        Ok(())
    }

    /// Get number of active subscribers
    pub fn count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Check if there are any subscribers
    #[inline]
    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.read().is_empty()
    }

    /// Broadcast an event to all subscribers
    ///
    /// Returns the number of subscribers that received the event
    pub fn broadcast(&self, event: Arc<RecordEvent>) -> usize {
        let subscribers = self.subscribers.read();
        let mut sent_count = 0;

        for subscriber in subscribers.iter() {
            if subscriber.try_send(Arc::clone(&event)) {
                sent_count += 1;
            }
        }

        sent_count
    }

    /// Clean up disconnected subscribers
    pub fn cleanup_disconnected(&self) -> usize {
        let mut subscribers = self.subscribers.write();
        let original_len = subscribers.len();
        subscribers.retain(|s| s.is_connected());
        original_len - subscribers.len()
    }
}

#[cfg(test)]
#[path = "subscriber_test.rs"]
mod tests;
