//! Storage configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Embedded engine selected for the database files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    /// Secondary engine. Any selector other than "SQLite" picks it.
    DuckDb,
}

impl BackendKind {
    /// "SQLite" (any case) selects SQLite; every other value selects the
    /// secondary backend.
    pub fn from_selector(selector: &str) -> Self {
        if selector.trim().eq_ignore_ascii_case("sqlite") {
            Self::Sqlite
        } else {
            Self::DuckDb
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "SQLite"),
            Self::DuckDb => write!(f, "DuckDB"),
        }
    }
}

/// The `[storage]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend selector. Default: "SQLite".
    pub db_type: Option<String>,
    /// Plugin data directory. Default: current directory.
    pub data_dir: Option<PathBuf>,
    /// Subdirectory of `data_dir` holding the database files. Default: "db".
    pub db_dir: Option<String>,
    /// Book database file name. Default: "books.db".
    pub books_file: Option<String>,
    /// Player metadata database file name. Default: "player.db".
    pub player_file: Option<String>,
    /// SQLite busy timeout in milliseconds. Default: 5000.
    pub busy_timeout_ms: Option<u64>,
}

impl StorageConfig {
    /// Config rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            ..Self::default()
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        BackendKind::from_selector(self.db_type.as_deref().unwrap_or("SQLite"))
    }

    pub fn effective_data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or(Path::new("."))
    }

    pub fn effective_db_dir(&self) -> &str {
        self.db_dir.as_deref().unwrap_or("db")
    }

    pub fn effective_books_file(&self) -> &str {
        self.books_file.as_deref().unwrap_or("books.db")
    }

    pub fn effective_player_file(&self) -> &str {
        self.player_file.as_deref().unwrap_or("player.db")
    }

    pub fn effective_busy_timeout_ms(&self) -> u64 {
        self.busy_timeout_ms.unwrap_or(5000)
    }
}
