//! `PlayerMetaStore`: per-plugin, per-player key/value metadata.

use signshop_core::errors::StorageError;
use signshop_core::traits::IPlayerMetaStore;
use signshop_core::types::player::PlayerId;

use crate::executor::{Statement, StatementExecutor};
use crate::schema::{ensure_schema, SchemaChange, PLAYER_META_TABLE};

const SELECT: &str =
    "SELECT Metavalue FROM PlayerMeta WHERE Plugin = ? AND Playername = ? AND Metakey = ?";
const INSERT: &str =
    "INSERT INTO PlayerMeta(Plugin, Playername, Metakey, Metavalue) VALUES (?, ?, ?, ?)";
const UPDATE: &str =
    "UPDATE PlayerMeta SET Metavalue = ? WHERE Plugin = ? AND Playername = ? AND Metakey = ?";
const DELETE: &str = "DELETE FROM PlayerMeta WHERE Plugin = ? AND Playername = ? AND Metakey = ?";
const DELETE_LIKE: &str =
    "DELETE FROM PlayerMeta WHERE Plugin = ? AND Playername = ? AND Metakey LIKE ?";

/// The `PlayerMeta` table of the player database.
#[derive(Debug, Clone)]
pub struct PlayerMetaStore {
    executor: StatementExecutor,
}

impl PlayerMetaStore {
    pub fn new(executor: StatementExecutor) -> Self {
        Self { executor }
    }

    pub fn init(&self) -> Result<SchemaChange, StorageError> {
        self.executor
            .with_session(|session| ensure_schema(session, &PLAYER_META_TABLE))
    }

    /// Metadata of one player within one plugin's namespace.
    pub fn for_player(&self, plugin: impl Into<String>, player: PlayerId) -> PlayerMetadata {
        PlayerMetadata {
            executor: self.executor.clone(),
            plugin: plugin.into(),
            player,
        }
    }

    pub fn executor(&self) -> &StatementExecutor {
        &self.executor
    }
}

/// A metadata view scoped to (plugin, player).
///
/// `set` and `update` check for the key and then write on separate
/// connections. Concurrent writers to the same key can interleave.
#[derive(Debug, Clone)]
pub struct PlayerMetadata {
    executor: StatementExecutor,
    plugin: String,
    player: PlayerId,
}

impl PlayerMetadata {
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    fn scoped<'q>(&self, sql: &'q str, key: &str) -> Statement<'q> {
        Statement::new(sql)
            .bind(self.plugin.as_str())
            .bind(self.player.as_str())
            .bind(key)
    }
}

impl IPlayerMetaStore for PlayerMetadata {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let rows = self.executor.query(&self.scoped(SELECT, key))?;
        Ok(rows
            .first()
            .and_then(|row| row.get_str("Metavalue"))
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.update(key, value)? {
            return Ok(());
        }
        self.executor
            .execute(&self.scoped(INSERT, key).bind(value))?;
        Ok(())
    }

    fn update(&self, key: &str, value: &str) -> Result<bool, StorageError> {
        if !self.has(key)? {
            return Ok(false);
        }
        let stmt = Statement::new(UPDATE)
            .bind(value)
            .bind(self.plugin.as_str())
            .bind(self.player.as_str())
            .bind(key);
        self.executor.execute(&stmt)?;
        Ok(true)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let outcome = self.executor.execute(&self.scoped(DELETE, key))?;
        Ok(outcome.affected > 0)
    }

    fn remove_like(&self, pattern: &str) -> Result<usize, StorageError> {
        let outcome = self.executor.execute(&self.scoped(DELETE_LIKE, pattern))?;
        Ok(outcome.affected)
    }
}
