//! `SignShopStorage`: the storage facade built from configuration.
//!
//! Owns the backend handle, places both database files, initializes their
//! schemas and hands out the stores. No connection is held between calls.

use std::sync::Arc;

use signshop_core::config::{BackendKind, StorageConfig};
use signshop_core::errors::{MigrationError, StorageError};
use signshop_core::traits::PlayerIdResolver;
use signshop_core::types::player::PlayerId;
use tracing::info;

use crate::backend::{open_backend, Backend};
use crate::books::BookStore;
use crate::executor::StatementExecutor;
use crate::layout::DatabaseLayout;
use crate::migration::{convert_to_stable_ids, MigrationReport};
use crate::player_meta::{PlayerMetaStore, PlayerMetadata};

pub struct SignShopStorage {
    backend: Arc<dyn Backend>,
    layout: DatabaseLayout,
    books: BookStore,
    player_meta: PlayerMetaStore,
}

impl SignShopStorage {
    /// Select the backend from `db_type`, resolve the database files and
    /// create or evolve both schemas.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let backend = open_backend(config)?;
        Self::with_backend(backend, config)
    }

    /// Like [`open`](Self::open) with an explicitly constructed backend.
    pub fn with_backend(backend: Arc<dyn Backend>, config: &StorageConfig) -> Result<Self, StorageError> {
        let layout = DatabaseLayout::from_config(config);
        let books_path = layout.resolve(config.effective_books_file());
        let player_path = layout.resolve(config.effective_player_file());

        let books = BookStore::new(StatementExecutor::new(Arc::clone(&backend), books_path));
        let player_meta =
            PlayerMetaStore::new(StatementExecutor::new(Arc::clone(&backend), player_path));
        books.init()?;
        player_meta.init()?;

        info!(
            backend = %backend.kind(),
            db_dir = %layout.db_dir_path().display(),
            "Storage ready"
        );
        Ok(Self {
            backend,
            layout,
            books,
            player_meta,
        })
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn layout(&self) -> &DatabaseLayout {
        &self.layout
    }

    pub fn books(&self) -> &BookStore {
        &self.books
    }

    pub fn player_meta(&self) -> &PlayerMetaStore {
        &self.player_meta
    }

    pub fn metadata_for(&self, plugin: &str, player: PlayerId) -> PlayerMetadata {
        self.player_meta.for_player(plugin, player)
    }

    /// Run the name-to-identifier migration for one plugin's metadata.
    pub fn convert_to_stable_ids(
        &self,
        plugin: &str,
        resolver: &dyn PlayerIdResolver,
    ) -> Result<MigrationReport, MigrationError> {
        convert_to_stable_ids(self.player_meta.executor(), plugin, resolver)
    }
}
