//! `BookStore`: the `Book` table of the books database.

use signshop_core::errors::StorageError;
use signshop_core::traits::{BookItem, IBookStore};
use signshop_core::types::book::{generation_from_stored, split_pages, BookContents, BookId};
use signshop_core::types::value::SqlValue;

use crate::executor::{Statement, StatementExecutor};
use crate::schema::{ensure_schema, SchemaChange, BOOK_TABLE};

const SELECT_ID: &str =
    "SELECT BookID FROM Book WHERE Title = ? AND Author = ? AND Pages = ? AND Generation = ?";
const INSERT: &str = "INSERT INTO Book(Title, Author, Pages, Generation) VALUES (?, ?, ?, ?)";
const DELETE: &str = "DELETE FROM Book WHERE BookID = ?";
const SELECT_ONE: &str = "SELECT Title, Author, Pages, Generation FROM Book WHERE BookID = ?";

/// Book records, de-duplicated by their full contents.
#[derive(Debug, Clone)]
pub struct BookStore {
    executor: StatementExecutor,
}

impl BookStore {
    pub fn new(executor: StatementExecutor) -> Self {
        Self { executor }
    }

    /// Create or evolve the `Book` table.
    pub fn init(&self) -> Result<SchemaChange, StorageError> {
        self.executor
            .with_session(|session| ensure_schema(session, &BOOK_TABLE))
    }

    fn lookup(&self, contents: &BookContents) -> Result<Option<BookId>, StorageError> {
        let rows = self.executor.query(&identity(SELECT_ID, contents))?;
        Ok(rows.first().and_then(|row| row.get_i64("BookID")))
    }
}

fn identity<'q>(sql: &'q str, contents: &BookContents) -> Statement<'q> {
    Statement::new(sql)
        .bind(contents.stored_title())
        .bind(contents.stored_author())
        .bind(contents.stored_pages())
        .bind(contents.stored_generation())
}

impl IBookStore for BookStore {
    fn add_book(&self, item: &dyn BookItem) -> Result<BookId, StorageError> {
        let contents = item.contents();
        if let Some(id) = self.lookup(&contents)? {
            return Ok(id);
        }
        let outcome = self
            .executor
            .execute(&identity(INSERT, &contents).returning_key("BookID"))?;
        outcome
            .generated_key
            .ok_or_else(|| StorageError::statement(INSERT, "insert returned no generated key"))
    }

    fn remove_book(&self, id: BookId) -> Result<bool, StorageError> {
        let outcome = self.executor.execute(&Statement::new(DELETE).bind(id))?;
        Ok(outcome.affected > 0)
    }

    fn get_book_id(&self, item: &dyn BookItem) -> Result<Option<BookId>, StorageError> {
        if !item.is_writable_book() {
            return Ok(None);
        }
        self.lookup(&item.contents())
    }

    fn hydrate(&self, item: &mut dyn BookItem, id: BookId) -> Result<bool, StorageError> {
        let rows = self.executor.query(&Statement::new(SELECT_ONE).bind(id))?;
        let Some(row) = rows.first() else {
            return Ok(false);
        };
        let Some(pages) = row.get_str("Pages") else {
            return Ok(false);
        };

        let text = |column: &str| {
            row.get_str(column)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let generation = row
            .get("Generation")
            .and_then(SqlValue::as_i64)
            .and_then(generation_from_stored);

        item.set_contents(BookContents {
            title: text("Title"),
            author: text("Author"),
            pages: split_pages(pages),
            generation,
        });
        Ok(true)
    }
}
