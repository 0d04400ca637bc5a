//! SQLite backend over rusqlite.

use std::path::Path;
use std::time::Duration;

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use signshop_core::config::BackendKind;
use signshop_core::errors::StorageError;
use signshop_core::types::value::{Rows, SqlValue};

use super::{connection_failed, Backend, Session};
use crate::schema::{column_definition, ColumnSpec, ColumnType, TableSpec};

/// SQLite engine handle. Holds only connection settings; connections are
/// opened per session.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    busy_timeout: Duration,
}

impl SqliteBackend {
    pub fn new(busy_timeout: Duration) -> Self {
        Self { busy_timeout }
    }
}

impl Default for SqliteBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

fn type_name(ty: ColumnType) -> String {
    match ty {
        ColumnType::Integer => "INTEGER".to_string(),
        ColumnType::Text => "TEXT".to_string(),
        ColumnType::Varchar(len) => format!("VARCHAR({len})"),
    }
}

impl Backend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn supports_generated_keys(&self) -> bool {
        true
    }

    fn connect(&self, path: &Path) -> Result<Box<dyn Session>, StorageError> {
        let conn = Connection::open(path).map_err(|e| connection_failed(path, e))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| connection_failed(path, e))?;
        Ok(Box::new(SqliteSession { conn }))
    }

    // A column declared exactly `INTEGER` and named in PRIMARY KEY aliases
    // the rowid, so the key is generated and read back via last_insert_rowid.
    fn create_table_sql(&self, spec: &TableSpec) -> Vec<String> {
        let mut defs = vec![format!("{} INTEGER", spec.key_column)];
        defs.extend(
            spec.columns
                .iter()
                .map(|c| column_definition(c, &type_name(c.ty), true)),
        );
        defs.push(format!("PRIMARY KEY({})", spec.key_column));
        vec![format!("CREATE TABLE {} ( {} )", spec.name, defs.join(", "))]
    }

    fn add_column_sql(&self, table: &str, column: &ColumnSpec) -> String {
        // SQLite accepts NOT NULL on ADD COLUMN only together with a default.
        let allow_not_null = column.default.is_some();
        format!(
            "ALTER TABLE {table} ADD COLUMN {}",
            column_definition(column, &type_name(column.ty), allow_not_null)
        )
    }
}

/// One open rusqlite connection. Closed on drop.
pub struct SqliteSession {
    conn: Connection,
}

struct Param<'a>(&'a SqlValue);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

fn from_value_ref(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(bytes) => SqlValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    }
}

impl Session for SqliteSession {
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Rows, StorageError> {
        let sqe = |e: rusqlite::Error| StorageError::statement(sql, e);
        let mut stmt = self.conn.prepare(sql).map_err(sqe)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut out = Rows::new(columns);

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(Param)))
            .map_err(sqe)?;
        while let Some(row) = rows.next().map_err(sqe)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_value_ref(row.get_ref(i).map_err(sqe)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<usize, StorageError> {
        self.conn
            .execute(sql, params_from_iter(params.iter().map(Param)))
            .map_err(|e| StorageError::statement(sql, e))
    }

    fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| StorageError::statement(sql, e))
    }

    fn last_insert_id(&self) -> Option<i64> {
        Some(self.conn.last_insert_rowid())
    }

    fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        const SQL: &str =
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE";
        let count: i64 = self
            .conn
            .query_row(SQL, [table], |row| row.get(0))
            .map_err(|e| StorageError::statement(SQL, e))?;
        Ok(count > 0)
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>, StorageError> {
        const SQL: &str = "SELECT name FROM pragma_table_info(?1)";
        let mut stmt = self
            .conn
            .prepare(SQL)
            .map_err(|e| StorageError::statement(SQL, e))?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))
            .map_err(|e| StorageError::statement(SQL, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::statement(SQL, e))?;
        Ok(names)
    }
}
