//! Broadcast events
//!
//! Two event kinds reach live subscribers: a reading was stored, or a reading
//! was permanently removed. Deletion events carry the record's prior state;
//! nothing is persisted for them. Updates are deliberately not broadcast.

use serde::{Deserialize, Serialize};

use sonda_store::Reading;

/// A live record event delivered to connected subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum RecordEvent {
    /// A reading was stored
    RecordCreated(Reading),
    /// A reading was removed; carries its last stored state
    RecordDeleted(Reading),
}

impl RecordEvent {
    /// The reading this event refers to
    pub fn reading(&self) -> &Reading {
        match self {
            Self::RecordCreated(r) | Self::RecordDeleted(r) => r,
        }
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
