//! # signshop-storage
//!
//! Embedded SQL persistence for SignShop.
//! Connection-per-call statement executor over SQLite (and DuckDB behind the
//! `duckdb` feature), additive schema initialization, the book and player
//! metadata stores, and the name-to-UUID metadata migration.

pub mod backend;
pub mod books;
pub mod engine;
pub mod executor;
pub mod layout;
pub mod migration;
pub mod player_meta;
pub mod schema;

pub use backend::{open_backend, Backend, Session};
pub use books::BookStore;
pub use engine::SignShopStorage;
pub use executor::{Expect, Mutation, Outcome, SessionHandle, Statement, StatementExecutor};
pub use layout::DatabaseLayout;
pub use migration::{convert_to_stable_ids, MigrationReport};
pub use player_meta::{PlayerMetaStore, PlayerMetadata};
pub use schema::{ensure_schema, SchemaChange, TableSpec};
