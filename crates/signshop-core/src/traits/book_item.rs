//! `BookItem`: the host's in-game book, as seen by the book store.

use crate::types::book::BookContents;

/// An item whose book fields can be read and written.
///
/// The host implements this over its own item type; the store only moves
/// `BookContents` in and out.
pub trait BookItem {
    /// Whether the item is a written or writable book at all.
    fn is_writable_book(&self) -> bool;

    fn contents(&self) -> BookContents;

    fn set_contents(&mut self, contents: BookContents);
}

/// A book held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleBook {
    pub contents: BookContents,
}

impl SimpleBook {
    pub fn new(contents: BookContents) -> Self {
        Self { contents }
    }
}

impl BookItem for SimpleBook {
    fn is_writable_book(&self) -> bool {
        true
    }

    fn contents(&self) -> BookContents {
        self.contents.clone()
    }

    fn set_contents(&mut self, contents: BookContents) {
        self.contents = contents;
    }
}
