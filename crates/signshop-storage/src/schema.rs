//! Declarative table layouts and additive schema initialization.
//!
//! A table is created when missing. When it exists, columns declared here
//! but absent from the live table are added one `ALTER TABLE` at a time.
//! Columns are never dropped or retyped.

use signshop_core::errors::StorageError;
use tracing::info;

use crate::executor::SessionHandle;

/// Portable column types. Each backend maps these to its own names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Varchar(u16),
}

/// A non-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
    pub not_null: bool,
    /// Literal SQL default, if any.
    pub default: Option<&'static str>,
}

impl ColumnSpec {
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            not_null: true,
            default: None,
        }
    }

    pub const fn nullable(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            not_null: false,
            default: None,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

/// A table with an integer key generated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub key_column: &'static str,
    pub columns: &'static [ColumnSpec],
}

pub const BOOK_TABLE: TableSpec = TableSpec {
    name: "Book",
    key_column: "BookID",
    columns: &[
        ColumnSpec::required("Title", ColumnType::Text),
        ColumnSpec::required("Author", ColumnType::Varchar(200)),
        ColumnSpec::nullable("Pages", ColumnType::Text),
        ColumnSpec::required("Generation", ColumnType::Integer).with_default("-1"),
    ],
};

pub const PLAYER_META_TABLE: TableSpec = TableSpec {
    name: "PlayerMeta",
    key_column: "PlayerMetaID",
    columns: &[
        ColumnSpec::required("Playername", ColumnType::Text),
        ColumnSpec::required("Plugin", ColumnType::Text),
        ColumnSpec::required("Metakey", ColumnType::Text),
        ColumnSpec::required("Metavalue", ColumnType::Text),
    ],
};

/// What `ensure_schema` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    Created,
    AddedColumns(Vec<String>),
    Unchanged,
}

/// Render `name TYPE [NOT NULL] [DEFAULT x]`.
pub(crate) fn column_definition(column: &ColumnSpec, type_name: &str, allow_not_null: bool) -> String {
    let mut def = format!("{} {}", column.name, type_name);
    if column.not_null && allow_not_null {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = column.default {
        def.push_str(" DEFAULT ");
        def.push_str(default);
    }
    def
}

fn schema_failed(table: &str, e: StorageError) -> StorageError {
    StorageError::SchemaFailed {
        table: table.to_string(),
        message: e.to_string(),
    }
}

/// Create `spec` if missing, otherwise add any declared columns the live
/// table lacks. Column names compare case-insensitively.
pub fn ensure_schema(session: &SessionHandle<'_>, spec: &TableSpec) -> Result<SchemaChange, StorageError> {
    let exists = session
        .table_exists(spec.name)
        .map_err(|e| schema_failed(spec.name, e))?;

    if !exists {
        for sql in session.backend().create_table_sql(spec) {
            session
                .execute_batch(&sql)
                .map_err(|e| schema_failed(spec.name, e))?;
        }
        info!(table = spec.name, "Created table");
        return Ok(SchemaChange::Created);
    }

    let live = session
        .column_names(spec.name)
        .map_err(|e| schema_failed(spec.name, e))?;
    let mut added = Vec::new();
    for column in spec.columns {
        if live.iter().any(|c| c.eq_ignore_ascii_case(column.name)) {
            continue;
        }
        let sql = session.backend().add_column_sql(spec.name, column);
        session
            .execute_batch(&sql)
            .map_err(|e| schema_failed(spec.name, e))?;
        info!(table = spec.name, column = column.name, "Added missing column");
        added.push(column.name.to_string());
    }

    Ok(if added.is_empty() {
        SchemaChange::Unchanged
    } else {
        SchemaChange::AddedColumns(added)
    })
}
