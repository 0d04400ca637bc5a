//! Book records and the stored page encoding.

/// Generated primary key of a `Book` row.
pub type BookId = i64;

/// Separator between pages in the stored `Pages` column (ETX).
pub const PAGE_SEPARATOR: char = '\u{3}';

/// Stored `Generation` value meaning "no generation".
pub const UNSET_GENERATION: i64 = -1;

/// The persisted fields of a book item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookContents {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Vec<String>,
    pub generation: Option<i32>,
}

impl BookContents {
    /// Title as stored: a missing title is the empty string.
    pub fn stored_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Author as stored: a missing author is the empty string.
    pub fn stored_author(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    pub fn stored_pages(&self) -> String {
        join_pages(&self.pages)
    }

    pub fn stored_generation(&self) -> i64 {
        self.generation.map_or(UNSET_GENERATION, i64::from)
    }
}

/// Join pages with [`PAGE_SEPARATOR`].
pub fn join_pages(pages: &[String]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push(PAGE_SEPARATOR);
        }
        out.push_str(page);
    }
    out
}

/// Split a stored `Pages` value. An empty value holds no pages.
pub fn split_pages(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(PAGE_SEPARATOR).map(str::to_string).collect()
}

/// Map a stored `Generation` back to the item field. -1 and values outside
/// the `i32` range are unset.
pub fn generation_from_stored(stored: i64) -> Option<i32> {
    if stored == UNSET_GENERATION {
        return None;
    }
    i32::try_from(stored).ok()
}
