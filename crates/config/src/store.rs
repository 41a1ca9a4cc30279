//! Record store configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Record store configuration
///
/// # Example
///
/// ```toml
/// [store]
/// db = "~/.sonda/readings.db"   # default
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the readings database
    /// Default: "~/.sonda/readings.db" (expanded at runtime)
    pub db: Option<PathBuf>,
}

impl StoreConfig {
    /// Get the database path, expanding ~ to home directory
    pub fn db_path(&self) -> PathBuf {
        if let Some(ref path) = self.db {
            expand_tilde(path)
        } else {
            // Default: ~/.sonda/readings.db
            dirs::home_dir()
                .map(|h| h.join(".sonda").join("readings.db"))
                .unwrap_or_else(|| PathBuf::from("./data/readings.db"))
        }
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    path.to_str()
        .and_then(|s| s.strip_prefix("~/"))
        .and_then(|stripped| dirs::home_dir().map(|home| home.join(stripped)))
        .unwrap_or_else(|| path.to_path_buf())
}
