//! Seams between the stores and the host plugin.

pub mod book_item;
pub mod identity;
pub mod storage;

pub use book_item::{BookItem, SimpleBook};
pub use identity::{PlayerIdResolver, StaticResolver};
pub use storage::{IBookStore, IPlayerMetaStore};
