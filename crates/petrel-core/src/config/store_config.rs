use serde::{Deserialize, Serialize};

use super::defaults;

/// Evidence store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database and corpus artifacts.
    pub workspace_root: String,
    /// Database filename inside the workspace root.
    pub db_filename: String,
    /// Number of read-only connections in the pool.
    pub read_pool_size: usize,
}

impl StoreConfig {
    /// Full path to the SQLite database file.
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.workspace_root).join(&self.db_filename)
    }

    /// Directory of extracted plain-text papers, one `.txt` per PDF.
    pub fn text_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.workspace_root).join("text")
    }

    /// Directory of per-paper metadata JSON files.
    pub fn metadata_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.workspace_root).join("metadata")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            workspace_root: defaults::DEFAULT_WORKSPACE_ROOT.to_string(),
            db_filename: defaults::DEFAULT_DB_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
        }
    }
}
