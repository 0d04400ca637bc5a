//! Store traits: the contract between plugin features and the storage
//! backend. The implementations live in `signshop-storage`. Both traits are
//! object-safe.

use crate::errors::StorageError;
use crate::traits::book_item::BookItem;
use crate::types::book::BookId;

/// Book record storage (`Book` table of `books.db`).
pub trait IBookStore {
    /// Store the item's contents unless an identical record exists.
    /// Returns the id of the stored (or already present) record.
    fn add_book(&self, item: &dyn BookItem) -> Result<BookId, StorageError>;

    /// Delete a record. Returns whether a row was removed.
    fn remove_book(&self, id: BookId) -> Result<bool, StorageError>;

    /// Id of the record identical to the item's contents. `None` if the item
    /// is not a writable book or no such record exists.
    fn get_book_id(&self, item: &dyn BookItem) -> Result<Option<BookId>, StorageError>;

    /// Copy a stored record into the item. Returns `false`, leaving the
    /// item untouched, when the row is missing or its pages are malformed.
    fn hydrate(&self, item: &mut dyn BookItem, id: BookId) -> Result<bool, StorageError>;
}

/// Key/value metadata of one player, namespaced by plugin.
pub trait IPlayerMetaStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }

    /// Insert the pair, or update it when the key already exists.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Update an existing key. Returns `false` without writing when the key
    /// is absent.
    fn update(&self, key: &str, value: &str) -> Result<bool, StorageError>;

    /// Returns whether a row was removed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete every key matching a SQL `LIKE` pattern. Returns the count.
    fn remove_like(&self, pattern: &str) -> Result<usize, StorageError>;
}
