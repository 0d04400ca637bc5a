//! Rewrite of player metadata keyed by legacy names to stable identifiers.
//!
//! Single pass over the plugin's rows in id order. Each row is deleted and
//! re-inserted under its stable identifier inside one transaction, so a
//! failed insert leaves the old row in place. The first failure aborts the
//! run: earlier rows stay converted, that row and all later rows are left
//! as they were. Running it again picks up where it stopped.

use signshop_core::errors::{MigrationError, StorageError};
use signshop_core::traits::PlayerIdResolver;
use signshop_core::types::player::{LegacyConversion, MetaEntry};
use signshop_core::types::value::Rows;
use tracing::{info, warn};

use crate::executor::{Statement, StatementExecutor};

const SELECT_PLUGIN_ROWS: &str = "SELECT PlayerMetaID, Playername, Metakey, Metavalue \
     FROM PlayerMeta WHERE Plugin = ? ORDER BY PlayerMetaID";
const DELETE_ROW: &str = "DELETE FROM PlayerMeta WHERE PlayerMetaID = ?";
const INSERT_ROW: &str =
    "INSERT INTO PlayerMeta(Plugin, Playername, Metakey, Metavalue) VALUES (?, ?, ?, ?)";

/// Outcome of a migration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationReport {
    /// The resolver reported no stable identifier support.
    Skipped,
    Completed {
        scanned: usize,
        converted: usize,
        /// Rows already keyed by their stable identifier.
        already_stable: usize,
        /// Rows with a NULL name or key, or a name the resolver did not know.
        unresolved: usize,
    },
}

struct Pending {
    row_id: i64,
    conversion: LegacyConversion,
}

#[derive(Default)]
struct Collected {
    pending: Vec<Pending>,
    scanned: usize,
    already_stable: usize,
    unresolved: usize,
}

fn collect(rows: &Rows, resolver: &dyn PlayerIdResolver) -> Collected {
    let mut out = Collected::default();
    for row in rows.iter() {
        out.scanned += 1;
        let (Some(row_id), Some(name), Some(key)) = (
            row.get_i64("PlayerMetaID"),
            row.get_str("Playername"),
            row.get_str("Metakey"),
        ) else {
            out.unresolved += 1;
            continue;
        };
        let entry = MetaEntry {
            player_name: name.to_string(),
            meta_key: key.to_string(),
            meta_value: row.get_str("Metavalue").unwrap_or_default().to_string(),
        };
        let Some(new_id) = resolver.resolve(&entry.player_name) else {
            out.unresolved += 1;
            continue;
        };
        if new_id.as_str().eq_ignore_ascii_case(&entry.player_name) {
            out.already_stable += 1;
            continue;
        }
        out.pending.push(Pending {
            row_id,
            conversion: LegacyConversion {
                old_name: entry.player_name,
                new_id,
                meta_key: entry.meta_key,
                meta_value: entry.meta_value,
            },
        });
    }
    out
}

/// Convert every `PlayerMeta` row of `plugin` still keyed by a player name.
pub fn convert_to_stable_ids(
    executor: &StatementExecutor,
    plugin: &str,
    resolver: &dyn PlayerIdResolver,
) -> Result<MigrationReport, MigrationError> {
    if !resolver.supports_stable_ids() {
        return Ok(MigrationReport::Skipped);
    }

    let rows = executor.query(&Statement::new(SELECT_PLUGIN_ROWS).bind(plugin))?;
    let collected = collect(&rows, resolver);

    if !collected.pending.is_empty() {
        info!(
            plugin,
            rows = collected.pending.len(),
            "Converting player metadata to stable identifiers"
        );
    }

    let mut converted = 0;
    for pending in &collected.pending {
        let conversion = &pending.conversion;
        let result = executor.with_session(|session| {
            session.in_transaction(|tx| {
                tx.execute(&Statement::new(DELETE_ROW).bind(pending.row_id))?;
                tx.execute(
                    &Statement::new(INSERT_ROW)
                        .bind(plugin)
                        .bind(conversion.new_id.as_str())
                        .bind(conversion.meta_key.as_str())
                        .bind(conversion.meta_value.as_str()),
                )?;
                Ok::<_, StorageError>(())
            })
        });

        if let Err(source) = result {
            warn!(
                player = %conversion.old_name,
                key = %conversion.meta_key,
                converted,
                "Failed conversion of player metadata, remaining rows left unconverted"
            );
            return Err(MigrationError::RowFailed {
                player_name: conversion.old_name.clone(),
                meta_key: conversion.meta_key.clone(),
                converted,
                source,
            });
        }
        converted += 1;
    }

    if converted > 0 {
        info!(plugin, converted, "Finished converting player metadata");
    }

    Ok(MigrationReport::Completed {
        scanned: collected.scanned,
        converted,
        already_stable: collected.already_stable,
        unresolved: collected.unresolved,
    })
}
