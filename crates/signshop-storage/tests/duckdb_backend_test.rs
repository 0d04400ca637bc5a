//! The store contracts on the DuckDB backend. Run with `--features duckdb`.
#![cfg(feature = "duckdb")]

use std::sync::Arc;

use signshop_core::config::{BackendKind, StorageConfig};
use signshop_core::traits::{IBookStore, IPlayerMetaStore, SimpleBook, StaticResolver};
use signshop_core::types::book::BookContents;
use signshop_core::types::player::PlayerId;
use signshop_storage::backend::DuckDbBackend;
use signshop_storage::schema::BOOK_TABLE;
use signshop_storage::{ensure_schema, MigrationReport, SchemaChange, SignShopStorage, Statement, StatementExecutor};
use tempfile::TempDir;
use uuid::Uuid;

fn duckdb_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        db_type: Some("H2".into()),
        ..StorageConfig::with_data_dir(dir.path())
    }
}

#[test]
fn generated_keys_come_from_returning() {
    let dir = TempDir::new().unwrap();
    let storage = SignShopStorage::open(&duckdb_config(&dir)).unwrap();
    assert_eq!(storage.backend_kind(), BackendKind::DuckDb);

    let a = SimpleBook::new(BookContents {
        title: Some("A".into()),
        author: None,
        pages: vec!["1".into(), "2".into()],
        generation: None,
    });
    let b = SimpleBook::new(BookContents {
        title: Some("B".into()),
        ..a.contents.clone()
    });

    let id_a = storage.books().add_book(&a).unwrap();
    let id_b = storage.books().add_book(&b).unwrap();
    assert_ne!(id_a, id_b);
    assert_eq!(storage.books().add_book(&a).unwrap(), id_a);

    let mut target = SimpleBook::default();
    assert!(storage.books().hydrate(&mut target, id_b).unwrap());
    assert_eq!(target, b);
}

#[test]
fn metadata_and_migration() {
    let dir = TempDir::new().unwrap();
    let storage = SignShopStorage::open(&duckdb_config(&dir)).unwrap();
    let meta = storage.metadata_for("SignShop", PlayerId::new("Alex"));
    meta.set("cooldown.a", "1").unwrap();
    meta.set("cooldown.b", "1").unwrap();
    meta.set("limit", "3").unwrap();
    meta.set("limit", "4").unwrap();
    assert_eq!(meta.remove_like("cooldown.%").unwrap(), 2);

    let alex = Uuid::new_v4();
    let report = storage
        .convert_to_stable_ids("SignShop", &StaticResolver::new().with_player("Alex", alex))
        .unwrap();
    assert!(matches!(report, MigrationReport::Completed { converted: 1, .. }));

    let migrated = storage.metadata_for("SignShop", PlayerId::from_uuid(alex));
    assert_eq!(migrated.get("limit").unwrap().as_deref(), Some("4"));
    assert!(!meta.has("limit").unwrap());
}

#[test]
fn schema_evolution_adds_generation() {
    let dir = TempDir::new().unwrap();
    let exec = StatementExecutor::new(Arc::new(DuckDbBackend::new()), dir.path().join("books.duckdb"));
    exec.with_session(|s| {
        s.execute_batch(
            "CREATE SEQUENCE Book_BookID_seq; \
             CREATE TABLE Book (BookID BIGINT PRIMARY KEY DEFAULT nextval('Book_BookID_seq'), \
             Title VARCHAR NOT NULL, Author VARCHAR NOT NULL, Pages VARCHAR); \
             INSERT INTO Book(Title, Author, Pages) VALUES ('Old', 'Someone', 'p');",
        )
    })
    .unwrap();

    let change = exec.with_session(|s| ensure_schema(s, &BOOK_TABLE)).unwrap();
    assert_eq!(change, SchemaChange::AddedColumns(vec!["Generation".to_string()]));
    let rows = exec
        .query(&Statement::new("SELECT Generation FROM Book"))
        .unwrap();
    assert_eq!(rows.first().unwrap().get_i64("Generation"), Some(-1));
}
