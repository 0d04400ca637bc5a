//! Configuration loaded from the host's `signshop.toml`.

pub mod storage_config;

pub use storage_config::{BackendKind, StorageConfig};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

/// Top-level configuration. Only the `[storage]` table is read here; the
/// host plugin owns every other section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignShopConfig {
    pub storage: StorageConfig,
}

impl SignShopConfig {
    /// Parse a TOML document. Unknown tables are ignored.
    pub fn from_toml_str(text: &str) -> Result<Self, StorageError> {
        toml::from_str(text).map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let text = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_storage_table_yields_defaults() {
        let cfg = SignShopConfig::from_toml_str("[shops]\nmax = 3\n").unwrap();
        assert_eq!(cfg.storage.backend_kind(), BackendKind::Sqlite);
        assert_eq!(cfg.storage.effective_books_file(), "books.db");
    }

    #[test]
    fn storage_table_overrides() {
        let cfg = SignShopConfig::from_toml_str(
            r#"
            [storage]
            db_type = "DuckDB"
            data_dir = "/srv/plugins/SignShop"
            busy_timeout_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.backend_kind(), BackendKind::DuckDb);
        assert_eq!(cfg.storage.effective_busy_timeout_ms(), 250);
        assert_eq!(
            cfg.storage.effective_data_dir(),
            Path::new("/srv/plugins/SignShop")
        );
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = SignShopConfig::from_toml_str("[storage\n").unwrap_err();
        assert!(matches!(err, StorageError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signshop.toml");
        std::fs::write(&path, "[storage]\nplayer_file = \"meta.db\"\n").unwrap();
        let cfg = SignShopConfig::load(&path).unwrap();
        assert_eq!(cfg.storage.effective_player_file(), "meta.db");
    }
}
