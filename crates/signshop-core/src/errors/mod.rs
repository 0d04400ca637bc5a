//! Error types for the persistence layer.
//! One enum per error family, each mapped to stable codes.

pub mod error_code;
pub mod migration_error;
pub mod storage_error;

pub use migration_error::MigrationError;
pub use storage_error::StorageError;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
