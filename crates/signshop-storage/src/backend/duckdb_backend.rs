//! DuckDB backend, compiled with the `duckdb` feature.
//!
//! DuckDB has no rowid of the last insert, so keys come from a per-table
//! sequence and the executor reads them back with `RETURNING`.

use std::path::Path;

use ::duckdb::types::Value;
use ::duckdb::{params_from_iter, Connection};
use signshop_core::config::BackendKind;
use signshop_core::errors::StorageError;
use signshop_core::types::value::{Rows, SqlValue};

use super::{connection_failed, Backend, Session};
use crate::schema::{column_definition, ColumnSpec, ColumnType, TableSpec};

#[derive(Debug, Clone, Default)]
pub struct DuckDbBackend;

impl DuckDbBackend {
    pub fn new() -> Self {
        Self
    }
}

fn type_name(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Integer => "BIGINT",
        ColumnType::Text | ColumnType::Varchar(_) => "VARCHAR",
    }
}

fn sequence_name(spec: &TableSpec) -> String {
    format!("{}_{}_seq", spec.name, spec.key_column)
}

impl Backend for DuckDbBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::DuckDb
    }

    fn supports_generated_keys(&self) -> bool {
        false
    }

    fn connect(&self, path: &Path) -> Result<Box<dyn Session>, StorageError> {
        let conn = Connection::open(path).map_err(|e| connection_failed(path, e))?;
        Ok(Box::new(DuckDbSession { conn }))
    }

    fn create_table_sql(&self, spec: &TableSpec) -> Vec<String> {
        let seq = sequence_name(spec);
        let mut defs = vec![format!(
            "{} BIGINT PRIMARY KEY DEFAULT nextval('{seq}')",
            spec.key_column
        )];
        defs.extend(
            spec.columns
                .iter()
                .map(|c| column_definition(c, type_name(c.ty), true)),
        );
        vec![
            format!("CREATE SEQUENCE IF NOT EXISTS {seq}"),
            format!("CREATE TABLE {} ( {} )", spec.name, defs.join(", ")),
        ]
    }

    // ADD COLUMN takes no constraints in DuckDB; the default still applies.
    fn add_column_sql(&self, table: &str, column: &ColumnSpec) -> String {
        format!(
            "ALTER TABLE {table} ADD COLUMN {}",
            column_definition(column, type_name(column.ty), false)
        )
    }
}

pub struct DuckDbSession {
    conn: Connection,
}

fn to_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::BigInt(*v),
        SqlValue::Real(v) => Value::Double(*v),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
}

fn from_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Integer(i64::from(b)),
        Value::TinyInt(v) => SqlValue::Integer(i64::from(v)),
        Value::SmallInt(v) => SqlValue::Integer(i64::from(v)),
        Value::Int(v) => SqlValue::Integer(i64::from(v)),
        Value::BigInt(v) => SqlValue::Integer(v),
        Value::UTinyInt(v) => SqlValue::Integer(i64::from(v)),
        Value::USmallInt(v) => SqlValue::Integer(i64::from(v)),
        Value::UInt(v) => SqlValue::Integer(i64::from(v)),
        Value::Float(v) => SqlValue::Real(f64::from(v)),
        Value::Double(v) => SqlValue::Real(v),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
        other => SqlValue::Text(format!("{other:?}")),
    }
}

impl Session for DuckDbSession {
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Rows, StorageError> {
        let sqe = |e: ::duckdb::Error| StorageError::statement(sql, e);
        let mut stmt = self.conn.prepare(sql).map_err(sqe)?;
        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_value)))
            .map_err(sqe)?;

        // Column metadata is only reliable once the statement has executed.
        let columns = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();
        let width = columns.len();
        let mut out = Rows::new(columns);

        while let Some(row) = rows.next().map_err(sqe)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_value(row.get::<_, Value>(i).map_err(sqe)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<usize, StorageError> {
        self.conn
            .execute(sql, params_from_iter(params.iter().map(to_value)))
            .map_err(|e| StorageError::statement(sql, e))
    }

    fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| StorageError::statement(sql, e))
    }

    fn last_insert_id(&self) -> Option<i64> {
        None
    }

    fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        let rows = self.query(
            "SELECT COUNT(*) AS n FROM information_schema.tables WHERE lower(table_name) = lower(?)",
            &[SqlValue::from(table)],
        )?;
        Ok(rows.first().and_then(|r| r.get_i64("n")).unwrap_or(0) > 0)
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>, StorageError> {
        let rows = self.query(
            "SELECT column_name FROM information_schema.columns \
             WHERE lower(table_name) = lower(?) ORDER BY ordinal_position",
            &[SqlValue::from(table)],
        )?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get_str("column_name").map(String::from))
            .collect())
    }
}
