//! Database connection and schema management
//!
//! Uses Turso (async SQLite-compatible) for the readings collection. The
//! database is opened once at process start; connections are derived per
//! operation from the shared handle.

use tracing::info;
use turso::{Builder, Connection, Database};

use crate::error::{Result, StoreError};
use crate::repo::ReadingRepo;

/// Readings database handle
///
/// An unreachable database at startup is not fatal to the process: the handle
/// stays in an unavailable state and every operation fails with
/// [`StoreError::Unavailable`] until a restart.
pub struct ReadingStore {
    db: Option<Database>,
}

impl ReadingStore {
    /// Open a file-based readings database and initialize its schema
    pub async fn open(path: &str) -> Result<Self> {
        if let Some(dir) = std::path::Path::new(path).parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|_| StoreError::Unavailable)?;
        }

        info!(path = %path, "opening readings database");
        let db = Builder::new_local(path).build().await?;

        let store = Self { db: Some(db) };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory readings database (for testing)
    pub async fn open_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;

        let store = Self { db: Some(db) };
        store.init_schema().await?;
        Ok(store)
    }

    /// A handle with no backing database
    ///
    /// Used when the database could not be opened at startup: the process
    /// keeps serving, every store operation fails until restart.
    pub fn unavailable() -> Self {
        Self { db: None }
    }

    /// Whether the backing database was reachable at startup
    pub fn is_available(&self) -> bool {
        self.db.is_some()
    }

    /// Get the readings repository
    pub fn readings(&self) -> ReadingRepo<'_> {
        ReadingRepo::new(self)
    }

    /// Derive a connection for a single operation
    pub(crate) fn connect(&self) -> Result<Connection> {
        let db = self.db.as_ref().ok_or(StoreError::Unavailable)?;
        Ok(db.connect()?)
    }

    /// Initialize the readings schema
    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(SCHEMA_READINGS, ()).await?;
        conn.execute(INDEX_READINGS_KIND, ()).await?;
        conn.execute(INDEX_READINGS_NAME, ()).await?;

        info!("readings schema initialized");
        Ok(())
    }
}

// =============================================================================
// Schema
// =============================================================================

// `kind`, `name` and `unit` are nullable on purpose: a NULL column is distinct
// from an empty string, and equality filters must not conflate the two.
const SCHEMA_READINGS: &str = r#"
CREATE TABLE IF NOT EXISTS readings (
    id TEXT PRIMARY KEY,
    kind TEXT,
    name TEXT,
    value TEXT NOT NULL,
    unit TEXT,
    recorded_at TEXT NOT NULL
)
"#;

const INDEX_READINGS_KIND: &str =
    "CREATE INDEX IF NOT EXISTS idx_readings_kind ON readings(kind)";

const INDEX_READINGS_NAME: &str =
    "CREATE INDEX IF NOT EXISTS idx_readings_name ON readings(name)";
