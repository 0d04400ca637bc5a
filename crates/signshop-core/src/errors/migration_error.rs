//! Errors raised by the player identifier migration.

use super::error_code::{self, SignShopErrorCode};
use super::StorageError;

/// Errors that abort a name-to-identifier migration run.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// A single row could not be rewritten. Rows converted before it stay
    /// converted; this row and every later row are left untouched.
    #[error("Failed conversion at meta for player '{player_name}' with metakey '{meta_key}' after {converted} converted rows: {source}")]
    RowFailed {
        player_name: String,
        meta_key: String,
        converted: usize,
        #[source]
        source: StorageError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SignShopErrorCode for MigrationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RowFailed { .. } => error_code::MIGRATION_ROW_FAILED,
            Self::Storage(e) => e.error_code(),
        }
    }
}
