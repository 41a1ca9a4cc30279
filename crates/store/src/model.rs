//! Reading models
//!
//! A reading is a single timestamped data point reported by a sensor or
//! actuator. The `value` field is deliberately untyped: payloads vary by
//! device (scalars, strings, structured objects), so no schema is imposed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored sensor/actuator reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Store-assigned unique identifier, immutable after creation
    pub id: String,
    /// Device category (e.g. "sensor", "actuator", or any caller-defined tag)
    pub kind: Option<String>,
    /// Device instance name
    pub name: Option<String>,
    /// Device payload, arbitrarily shaped
    pub value: serde_json::Value,
    /// Measurement unit
    pub unit: Option<String>,
    /// Creation time, assigned by the store when the caller omits it
    pub timestamp: DateTime<Utc>,
}

/// Payload for creating or replacing a reading
///
/// Everything is optional: the store assigns identity and defaults the
/// timestamp at write time. Fields are never cross-validated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReading {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Reading {
    /// Materialize a payload into a stored reading, assigning a fresh id and
    /// defaulting the timestamp to now.
    pub fn from_payload(payload: NewReading) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), payload)
    }

    /// Materialize a payload at an existing id (full replacement).
    pub fn with_id(id: impl Into<String>, payload: NewReading) -> Self {
        Self {
            id: id.into(),
            kind: payload.kind,
            name: payload.name,
            value: payload.value,
            unit: payload.unit,
            timestamp: payload.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_assigns_id_and_timestamp() {
        let reading = Reading::from_payload(NewReading::default());
        assert!(!reading.id.is_empty());
        // Defaulted to "now", which is strictly after any fixed past instant
        let epoch: DateTime<Utc> = "2000-01-01T00:00:00Z".parse().unwrap();
        assert!(reading.timestamp > epoch);
        assert_eq!(reading.value, serde_json::Value::Null);
    }

    #[test]
    fn test_from_payload_keeps_caller_timestamp() {
        let ts: DateTime<Utc> = "2024-06-01T12:00:00Z".parse().unwrap();
        let reading = Reading::from_payload(NewReading {
            timestamp: Some(ts),
            ..Default::default()
        });
        assert_eq!(reading.timestamp, ts);
    }

    #[test]
    fn test_with_id_preserves_identity() {
        let reading = Reading::with_id(
            "fixed-id",
            NewReading {
                name: Some("temp1".into()),
                value: json!({"celsius": 21.5}),
                ..Default::default()
            },
        );
        assert_eq!(reading.id, "fixed-id");
        assert_eq!(reading.value, json!({"celsius": 21.5}));
    }
}
