//! Player metadata store: scoping, upserts and pattern deletes.

use std::sync::Arc;

use signshop_core::traits::IPlayerMetaStore;
use signshop_core::types::player::PlayerId;
use signshop_storage::backend::SqliteBackend;
use signshop_storage::{PlayerMetaStore, Statement, StatementExecutor};
use tempfile::TempDir;

fn store(dir: &TempDir) -> PlayerMetaStore {
    let exec = StatementExecutor::new(Arc::new(SqliteBackend::default()), dir.path().join("player.db"));
    let store = PlayerMetaStore::new(exec);
    store.init().unwrap();
    store
}

fn row_count(store: &PlayerMetaStore) -> i64 {
    let rows = store
        .executor()
        .query(&Statement::new("SELECT COUNT(*) AS n FROM PlayerMeta"))
        .unwrap();
    rows.first().unwrap().get_i64("n").unwrap()
}

#[test]
fn set_inserts_then_updates() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let meta = store.for_player("SignShop", PlayerId::new("Alex"));

    assert_eq!(meta.get("limit").unwrap(), None);
    assert!(!meta.has("limit").unwrap());

    meta.set("limit", "5").unwrap();
    assert_eq!(meta.get("limit").unwrap().as_deref(), Some("5"));

    meta.set("limit", "7").unwrap();
    assert_eq!(meta.get("limit").unwrap().as_deref(), Some("7"));
    assert_eq!(row_count(&store), 1);
}

#[test]
fn update_of_absent_key_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let meta = store.for_player("SignShop", PlayerId::new("Alex"));

    assert!(!meta.update("missing", "x").unwrap());
    assert_eq!(row_count(&store), 0);

    meta.set("present", "1").unwrap();
    assert!(meta.update("present", "2").unwrap());
    assert_eq!(meta.get("present").unwrap().as_deref(), Some("2"));
}

#[test]
fn namespaces_are_isolated() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let alex = store.for_player("SignShop", PlayerId::new("Alex"));
    let steve = store.for_player("SignShop", PlayerId::new("Steve"));
    let other_plugin = store.for_player("Other", PlayerId::new("Alex"));

    alex.set("k", "alex").unwrap();
    steve.set("k", "steve").unwrap();
    other_plugin.set("k", "other").unwrap();

    assert_eq!(alex.get("k").unwrap().as_deref(), Some("alex"));
    assert_eq!(steve.get("k").unwrap().as_deref(), Some("steve"));
    assert_eq!(other_plugin.get("k").unwrap().as_deref(), Some("other"));

    assert!(alex.remove("k").unwrap());
    assert!(!alex.remove("k").unwrap());
    assert_eq!(steve.get("k").unwrap().as_deref(), Some("steve"));
}

#[test]
fn remove_like_matches_pattern_within_scope() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let alex = store.for_player("SignShop", PlayerId::new("Alex"));
    let steve = store.for_player("SignShop", PlayerId::new("Steve"));

    for key in ["cooldown.sign1", "cooldown.sign2", "limit"] {
        alex.set(key, "1").unwrap();
        steve.set(key, "1").unwrap();
    }

    assert_eq!(alex.remove_like("cooldown.%").unwrap(), 2);
    assert!(!alex.has("cooldown.sign1").unwrap());
    assert!(alex.has("limit").unwrap());
    assert!(steve.has("cooldown.sign1").unwrap());
    assert!(steve.has("cooldown.sign2").unwrap());
    assert_eq!(alex.remove_like("nothing%").unwrap(), 0);
}
