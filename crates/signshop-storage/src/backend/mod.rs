//! Embedded engine abstraction.
//!
//! A `Backend` is the explicitly constructed engine handle: it opens
//! sessions and renders the DDL that differs between engines. A `Session`
//! is one open connection; dropping it closes the connection.

pub mod sqlite_backend;
#[cfg(feature = "duckdb")]
pub mod duckdb_backend;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use signshop_core::config::{BackendKind, StorageConfig};
use signshop_core::errors::StorageError;
use signshop_core::types::value::{Rows, SqlValue};
use tracing::warn;

use crate::schema::{ColumnSpec, TableSpec};

pub use sqlite_backend::SqliteBackend;
#[cfg(feature = "duckdb")]
pub use duckdb_backend::DuckDbBackend;

/// An embedded SQL engine.
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Whether the engine reports the key of the last inserted row natively.
    /// When `false`, the executor asks for the key with `RETURNING`.
    fn supports_generated_keys(&self) -> bool;

    /// Open a connection to a database file, creating the file if needed.
    fn connect(&self, path: &Path) -> Result<Box<dyn Session>, StorageError>;

    /// Statements that create the table, in execution order.
    fn create_table_sql(&self, spec: &TableSpec) -> Vec<String>;

    /// Additive column statement for schema evolution.
    fn add_column_sql(&self, table: &str, column: &ColumnSpec) -> String;
}

/// One open connection.
pub trait Session {
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Rows, StorageError>;

    /// Run a mutation, returning the affected-row count.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<usize, StorageError>;

    /// Run parameterless statements separated by `;`.
    fn execute_batch(&self, sql: &str) -> Result<(), StorageError>;

    /// Key of the last inserted row, if the engine tracks one.
    fn last_insert_id(&self) -> Option<i64>;

    fn table_exists(&self, table: &str) -> Result<bool, StorageError>;

    fn column_names(&self, table: &str) -> Result<Vec<String>, StorageError>;
}

/// Construct the backend selected by `db_type`.
pub fn open_backend(config: &StorageConfig) -> Result<Arc<dyn Backend>, StorageError> {
    match config.backend_kind() {
        BackendKind::Sqlite => Ok(Arc::new(SqliteBackend::new(Duration::from_millis(
            config.effective_busy_timeout_ms(),
        )))),
        BackendKind::DuckDb => open_secondary(),
    }
}

#[cfg(feature = "duckdb")]
fn open_secondary() -> Result<Arc<dyn Backend>, StorageError> {
    Ok(Arc::new(DuckDbBackend::new()))
}

#[cfg(not(feature = "duckdb"))]
fn open_secondary() -> Result<Arc<dyn Backend>, StorageError> {
    warn!("DuckDB backend selected but this build was compiled without the `duckdb` feature");
    Err(StorageError::BackendUnavailable {
        backend: BackendKind::DuckDb.to_string(),
    })
}

pub(crate) fn connection_failed(path: &Path, e: impl std::fmt::Display) -> StorageError {
    warn!(path = %path.display(), error = %e, "Connection could not be established");
    StorageError::ConnectionFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_selected_by_default() {
        let backend = open_backend(&StorageConfig::default()).unwrap();
        assert_eq!(backend.kind(), BackendKind::Sqlite);
        assert!(backend.supports_generated_keys());
    }

    #[cfg(not(feature = "duckdb"))]
    #[test]
    fn secondary_unavailable_without_feature() {
        let cfg = StorageConfig {
            db_type: Some("H2".into()),
            ..StorageConfig::default()
        };
        let err = open_backend(&cfg).err().unwrap();
        assert!(matches!(err, StorageError::BackendUnavailable { .. }));
    }

    #[cfg(feature = "duckdb")]
    #[test]
    fn secondary_selected_for_other_values() {
        let cfg = StorageConfig {
            db_type: Some("H2".into()),
            ..StorageConfig::default()
        };
        let backend = open_backend(&cfg).unwrap();
        assert_eq!(backend.kind(), BackendKind::DuckDb);
        assert!(!backend.supports_generated_keys());
    }
}
