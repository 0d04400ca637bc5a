//! # signshop-core
//!
//! Foundation crate for the SignShop persistence layer.
//! Defines the value and record types, the store traits, errors, config
//! and tracing setup. `signshop-storage` depends on this.

pub mod config;
pub mod errors;
pub mod logging;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{BackendKind, SignShopConfig, StorageConfig};
pub use errors::error_code::SignShopErrorCode;
pub use errors::{MigrationError, StorageError};
pub use types::book::{BookContents, BookId};
pub use types::player::PlayerId;
pub use types::value::{Rows, SqlValue};
