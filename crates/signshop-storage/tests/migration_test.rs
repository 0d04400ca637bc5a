//! Legacy name to stable identifier migration.

use std::sync::Arc;

use signshop_core::errors::MigrationError;
use signshop_core::traits::{IPlayerMetaStore, StaticResolver};
use signshop_core::types::player::PlayerId;
use signshop_storage::backend::SqliteBackend;
use signshop_storage::{convert_to_stable_ids, MigrationReport, PlayerMetaStore, Statement};
use tempfile::TempDir;
use uuid::Uuid;

const PLUGIN: &str = "SignShop";

fn store(dir: &TempDir) -> PlayerMetaStore {
    let exec = signshop_storage::StatementExecutor::new(
        Arc::new(SqliteBackend::default()),
        dir.path().join("player.db"),
    );
    let store = PlayerMetaStore::new(exec);
    store.init().unwrap();
    store
}

/// (Playername, Metakey, Metavalue) for every row of the plugin, in id order.
fn dump(store: &PlayerMetaStore) -> Vec<(String, String, String)> {
    let rows = store
        .executor()
        .query(
            &Statement::new(
                "SELECT Playername, Metakey, Metavalue FROM PlayerMeta WHERE Plugin = ? ORDER BY Metakey",
            )
            .bind(PLUGIN),
        )
        .unwrap();
    rows.iter()
        .map(|r| {
            (
                r.get_str("Playername").unwrap().to_string(),
                r.get_str("Metakey").unwrap().to_string(),
                r.get_str("Metavalue").unwrap().to_string(),
            )
        })
        .collect()
}

fn seed(store: &PlayerMetaStore, name: &str, key: &str, value: &str) {
    store
        .for_player(PLUGIN, PlayerId::new(name))
        .set(key, value)
        .unwrap();
}

#[test]
fn legacy_mode_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    seed(&store, "Alex", "k", "v");

    let report = convert_to_stable_ids(store.executor(), PLUGIN, &StaticResolver::legacy()).unwrap();
    assert_eq!(report, MigrationReport::Skipped);
    assert_eq!(dump(&store)[0].0, "Alex");
}

#[test]
fn converts_resolved_rows_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let alex = Uuid::new_v4();
    let steve = Uuid::new_v4();
    let resolver = StaticResolver::new()
        .with_player("Alex", alex)
        .with_player("Steve", steve);

    seed(&store, "Alex", "a", "1");
    seed(&store, "Steve", "b", "2");
    seed(&store, "Ghost", "c", "3");
    store
        .for_player("Other", PlayerId::new("Alex"))
        .set("d", "4")
        .unwrap();

    let report = convert_to_stable_ids(store.executor(), PLUGIN, &resolver).unwrap();
    assert_eq!(
        report,
        MigrationReport::Completed {
            scanned: 3,
            converted: 2,
            already_stable: 0,
            unresolved: 1,
        }
    );

    let after_first = dump(&store);
    assert_eq!(
        after_first,
        vec![
            (alex.to_string(), "a".to_string(), "1".to_string()),
            (steve.to_string(), "b".to_string(), "2".to_string()),
            ("Ghost".to_string(), "c".to_string(), "3".to_string()),
        ]
    );

    // Other plugins' rows are not touched.
    let other = store.for_player("Other", PlayerId::new("Alex"));
    assert_eq!(other.get("d").unwrap().as_deref(), Some("4"));

    let second = convert_to_stable_ids(store.executor(), PLUGIN, &resolver).unwrap();
    assert_eq!(
        second,
        MigrationReport::Completed {
            scanned: 3,
            converted: 0,
            already_stable: 2,
            unresolved: 1,
        }
    );
    assert_eq!(dump(&store), after_first);
}

#[test]
fn failed_row_stops_the_batch_and_keeps_later_rows() {
    signshop_core::logging::init();
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let mut resolver = StaticResolver::new();
    for (i, id) in ids.iter().enumerate() {
        resolver.insert(&format!("p{i}"), *id);
        seed(&store, &format!("p{i}"), &format!("k{i}"), "v");
    }

    // Reject the insert for the third row.
    store
        .executor()
        .with_session(|s| {
            s.execute_batch(&format!(
                "CREATE TRIGGER reject BEFORE INSERT ON PlayerMeta \
                 WHEN NEW.Playername = '{}' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                ids[2]
            ))
        })
        .unwrap();

    let err = convert_to_stable_ids(store.executor(), PLUGIN, &resolver).unwrap_err();
    match &err {
        MigrationError::RowFailed {
            player_name,
            meta_key,
            converted,
            ..
        } => {
            assert_eq!(player_name, "p2");
            assert_eq!(meta_key, "k2");
            assert_eq!(*converted, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    let names: Vec<String> = dump(&store).into_iter().map(|(name, _, _)| name).collect();
    assert_eq!(
        names,
        vec![
            ids[0].to_string(),
            ids[1].to_string(),
            "p2".to_string(),
            "p3".to_string(),
        ]
    );

    // Once the obstacle is gone a re-run finishes the job.
    store
        .executor()
        .with_session(|s| s.execute_batch("DROP TRIGGER reject"))
        .unwrap();
    let report = convert_to_stable_ids(store.executor(), PLUGIN, &resolver).unwrap();
    assert!(matches!(report, MigrationReport::Completed { converted: 2, .. }));
    let names: Vec<String> = dump(&store).into_iter().map(|(name, _, _)| name).collect();
    assert_eq!(names, ids.iter().map(Uuid::to_string).collect::<Vec<_>>());
}
