//! Storage-layer errors for embedded SQL operations.

use std::path::PathBuf;

use super::error_code::{self, SignShopErrorCode};

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Connection to {path} could not be established: {message}")]
    ConnectionFailed { path: PathBuf, message: String },

    #[error("Query `{query}` failed: {message}")]
    StatementFailed { query: String, message: String },

    #[error("Backend {backend} is not available in this build")]
    BackendUnavailable { backend: String },

    #[error("Schema initialization of {table} failed: {message}")]
    SchemaFailed { table: String, message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Shorthand for a failed statement, keeping the query text for the log line.
    pub fn statement(query: &str, e: impl std::fmt::Display) -> Self {
        Self::StatementFailed {
            query: query.to_string(),
            message: e.to_string(),
        }
    }
}

impl SignShopErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed { .. } => error_code::CONNECTION_FAILED,
            Self::StatementFailed { .. } => error_code::STATEMENT_FAILED,
            Self::BackendUnavailable { .. } => error_code::BACKEND_UNAVAILABLE,
            Self::SchemaFailed { .. } => error_code::SCHEMA_FAILED,
            Self::Io { .. } => error_code::IO_ERROR,
            Self::Config(_) => error_code::CONFIG_ERROR,
        }
    }
}
