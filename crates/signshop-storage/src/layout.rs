//! Database file placement under the plugin data directory.

use std::fs;
use std::path::{Path, PathBuf};

use signshop_core::config::StorageConfig;
use tracing::{info, warn};

/// Where the database files live: `<data_dir>/<db_dir>/<file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLayout {
    data_dir: PathBuf,
    db_dir: PathBuf,
}

impl DatabaseLayout {
    pub fn new(data_dir: impl Into<PathBuf>, db_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.into();
        let db_dir = data_dir.join(db_dir);
        Self { data_dir, db_dir }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.effective_data_dir(), config.effective_db_dir())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_dir_path(&self) -> &Path {
        &self.db_dir
    }

    /// Path of `filename`, relocating a file left in the data directory by
    /// older releases into the db directory first. An existing file in the
    /// db directory is never overwritten. If the directory cannot be created
    /// or the file cannot be moved, the old location is used.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        let legacy = self.data_dir.join(filename);
        let target = self.db_dir.join(filename);

        if let Err(e) = fs::create_dir_all(&self.db_dir) {
            warn!(path = %self.db_dir.display(), error = %e, "Could not create database directory, using data directory");
            return legacy;
        }

        if target.exists() || !legacy.is_file() {
            return target;
        }

        match fs::rename(&legacy, &target) {
            Ok(()) => {
                info!(from = %legacy.display(), to = %target.display(), "Moved database file");
                target
            }
            Err(e) => {
                warn!(path = %legacy.display(), error = %e, "Could not move database file, using old location");
                legacy
            }
        }
    }
}
