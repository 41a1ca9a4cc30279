//! Reading repository
//!
//! CRUD operations for the readings collection.

use chrono::{DateTime, Utc};
use turso::Value;

use crate::db::ReadingStore;
use crate::error::{Result, StoreError};
use crate::model::{NewReading, Reading};

/// Reading repository
pub struct ReadingRepo<'a> {
    store: &'a ReadingStore,
}

impl<'a> ReadingRepo<'a> {
    /// Create a new reading repository
    pub fn new(store: &'a ReadingStore) -> Self {
        Self { store }
    }

    /// Persist a new reading, assigning its id and defaulting the timestamp
    pub async fn insert(&self, payload: NewReading) -> Result<Reading> {
        let conn = self.store.connect()?;
        let reading = Reading::from_payload(payload);

        let value_json = serde_json::to_string(&reading.value)?;
        let recorded_at = reading.timestamp.to_rfc3339();

        conn.execute(
            r#"
            INSERT INTO readings (id, kind, name, value, unit, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            vec![
                Value::Text(reading.id.clone()),
                opt_text(&reading.kind),
                opt_text(&reading.name),
                Value::Text(value_json),
                opt_text(&reading.unit),
                Value::Text(recorded_at),
            ],
        )
        .await?;

        Ok(reading)
    }

    /// Get a reading by id
    pub async fn get(&self, id: &str) -> Result<Option<Reading>> {
        let conn = self.store.connect()?;

        let mut rows = conn
            .query("SELECT * FROM readings WHERE id = ?1", [id])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_reading(&row)?))
        } else {
            Ok(None)
        }
    }

    /// List all readings in store-native order
    pub async fn list(&self) -> Result<Vec<Reading>> {
        let conn = self.store.connect()?;

        let mut rows = conn.query("SELECT * FROM readings", ()).await?;

        let mut readings = Vec::new();
        while let Some(row) = rows.next().await? {
            readings.push(Self::row_to_reading(&row)?);
        }

        Ok(readings)
    }

    /// Find readings by exact field equality
    ///
    /// A `None` filter leaves that field unconstrained. `Some("")` is a real
    /// filter value: it matches readings whose field equals the empty string,
    /// not readings where the field is absent.
    pub async fn find(&self, kind: Option<&str>, name: Option<&str>) -> Result<Vec<Reading>> {
        let conn = self.store.connect()?;

        let mut rows = match (kind, name) {
            (Some(k), Some(n)) => {
                conn.query(
                    "SELECT * FROM readings WHERE kind = ?1 AND name = ?2",
                    [k, n],
                )
                .await?
            }
            (Some(k), None) => {
                conn.query("SELECT * FROM readings WHERE kind = ?1", [k])
                    .await?
            }
            (None, Some(n)) => {
                conn.query("SELECT * FROM readings WHERE name = ?1", [n])
                    .await?
            }
            (None, None) => conn.query("SELECT * FROM readings", ()).await?,
        };

        let mut readings = Vec::new();
        while let Some(row) = rows.next().await? {
            readings.push(Self::row_to_reading(&row)?);
        }

        Ok(readings)
    }

    /// Replace the reading at `id` with the payload's fields, preserving id
    pub async fn replace(&self, id: &str, payload: NewReading) -> Result<Reading> {
        let conn = self.store.connect()?;
        let reading = Reading::with_id(id, payload);

        let value_json = serde_json::to_string(&reading.value)?;
        let recorded_at = reading.timestamp.to_rfc3339();

        let affected = conn
            .execute(
                r#"
                UPDATE readings
                SET kind = ?1, name = ?2, value = ?3, unit = ?4, recorded_at = ?5
                WHERE id = ?6
                "#,
                vec![
                    opt_text(&reading.kind),
                    opt_text(&reading.name),
                    Value::Text(value_json),
                    opt_text(&reading.unit),
                    Value::Text(recorded_at),
                    Value::Text(reading.id.clone()),
                ],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::not_found(id));
        }

        Ok(reading)
    }

    /// Delete a reading, returning its prior state
    pub async fn delete(&self, id: &str) -> Result<Reading> {
        let existing = self.get(id).await?.ok_or_else(|| StoreError::not_found(id))?;

        let conn = self.store.connect()?;
        conn.execute("DELETE FROM readings WHERE id = ?1", [id])
            .await?;

        Ok(existing)
    }

    // =========================================================================
    // Row conversion helper
    // =========================================================================

    fn row_to_reading(row: &turso::Row) -> Result<Reading> {
        let id = row.get_value(0)?.as_text().cloned().unwrap_or_default();
        let kind = row.get_value(1)?.as_text().cloned();
        let name = row.get_value(2)?.as_text().cloned();
        let value_json = row.get_value(3)?.as_text().cloned().unwrap_or_default();
        let unit = row.get_value(4)?.as_text().cloned();
        let recorded_at_str = row.get_value(5)?.as_text().cloned().unwrap_or_default();

        let value: serde_json::Value = serde_json::from_str(&value_json)?;

        let timestamp = DateTime::parse_from_rfc3339(&recorded_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Reading {
            id,
            kind,
            name,
            value,
            unit,
            timestamp,
        })
    }
}

/// Map an optional string to a TEXT or NULL parameter
fn opt_text(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

#[cfg(test)]
#[path = "repo_test.rs"]
mod tests;
