//! Stable error codes exposed to the host plugin.

pub const CONNECTION_FAILED: &str = "CONNECTION_FAILED";
pub const STATEMENT_FAILED: &str = "STATEMENT_FAILED";
pub const BACKEND_UNAVAILABLE: &str = "BACKEND_UNAVAILABLE";
pub const SCHEMA_FAILED: &str = "SCHEMA_FAILED";
pub const IO_ERROR: &str = "IO_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MIGRATION_ROW_FAILED: &str = "MIGRATION_ROW_FAILED";

/// Maps an error variant to a stable string code.
pub trait SignShopErrorCode {
    fn error_code(&self) -> &'static str;
}
