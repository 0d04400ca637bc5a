//! `StatementExecutor`: connection-per-call statement execution.
//!
//! Every call opens a fresh session on the target file, runs its statement
//! and drops the session before returning, so connections never outlive an
//! operation. Results are materialized into `Rows` first.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use signshop_core::errors::StorageError;
use signshop_core::types::value::{Rows, SqlValue};
use tracing::{debug, warn};

use crate::backend::{Backend, Session};

/// A statement plus its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement<'q> {
    sql: Cow<'q, str>,
    params: Vec<SqlValue>,
    generated_key: Option<&'q str>,
}

impl<'q> Statement<'q> {
    pub fn new(sql: impl Into<Cow<'q, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            generated_key: None,
        }
    }

    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn with_params(mut self, params: Vec<SqlValue>) -> Self {
        self.params = params;
        self
    }

    /// Ask for the key generated by an `INSERT`, read from `column`.
    pub fn returning_key(mut self, column: &'q str) -> Self {
        self.generated_key = Some(column);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// Which kind of result the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Rows,
    Mutation,
}

/// Result of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mutation {
    pub affected: usize,
    /// Set only when the statement asked for a generated key.
    pub generated_key: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(Rows),
    Mutation(Mutation),
}

/// Executes statements against one database file.
#[derive(Clone)]
pub struct StatementExecutor {
    backend: Arc<dyn Backend>,
    path: PathBuf,
}

impl StatementExecutor {
    pub fn new(backend: Arc<dyn Backend>, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Run one statement on a fresh connection.
    pub fn run(&self, stmt: &Statement<'_>, expect: Expect) -> Result<Outcome, StorageError> {
        self.open()?.run(stmt, expect)
    }

    pub fn query(&self, stmt: &Statement<'_>) -> Result<Rows, StorageError> {
        self.open()?.query(stmt)
    }

    pub fn execute(&self, stmt: &Statement<'_>) -> Result<Mutation, StorageError> {
        self.open()?.execute(stmt)
    }

    /// Run several statements on one connection, closed when `f` returns.
    pub fn with_session<T, E>(&self, f: impl FnOnce(&SessionHandle<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let handle = self.open()?;
        f(&handle)
    }

    fn open(&self) -> Result<SessionHandle<'_>, StorageError> {
        let session = self.backend.connect(&self.path)?;
        Ok(SessionHandle {
            backend: self.backend.as_ref(),
            session,
        })
    }
}

impl std::fmt::Debug for StatementExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementExecutor")
            .field("backend", &self.backend.kind())
            .field("path", &self.path)
            .finish()
    }
}

/// An open session. The connection closes when the handle drops.
pub struct SessionHandle<'a> {
    backend: &'a dyn Backend,
    session: Box<dyn Session>,
}

impl<'a> SessionHandle<'a> {
    pub fn backend(&self) -> &'a dyn Backend {
        self.backend
    }

    pub fn run(&self, stmt: &Statement<'_>, expect: Expect) -> Result<Outcome, StorageError> {
        match expect {
            Expect::Rows => self.query(stmt).map(Outcome::Rows),
            Expect::Mutation => self.execute(stmt).map(Outcome::Mutation),
        }
    }

    pub fn query(&self, stmt: &Statement<'_>) -> Result<Rows, StorageError> {
        debug!(query = stmt.sql(), params = stmt.params().len(), "query");
        self.session
            .query(stmt.sql(), stmt.params())
            .map_err(|e| logged(stmt.sql(), e))
    }

    pub fn execute(&self, stmt: &Statement<'_>) -> Result<Mutation, StorageError> {
        debug!(query = stmt.sql(), params = stmt.params().len(), "execute");
        match stmt.generated_key {
            None => {
                let affected = self
                    .session
                    .execute(stmt.sql(), stmt.params())
                    .map_err(|e| logged(stmt.sql(), e))?;
                Ok(Mutation {
                    affected,
                    generated_key: None,
                })
            }
            Some(_) if self.backend.supports_generated_keys() => {
                let affected = self
                    .session
                    .execute(stmt.sql(), stmt.params())
                    .map_err(|e| logged(stmt.sql(), e))?;
                Ok(Mutation {
                    affected,
                    generated_key: (affected > 0).then(|| self.session.last_insert_id()).flatten(),
                })
            }
            Some(column) => {
                let sql = format!(
                    "{} RETURNING {column}",
                    stmt.sql().trim_end().trim_end_matches(';')
                );
                let rows = self
                    .session
                    .query(&sql, stmt.params())
                    .map_err(|e| logged(&sql, e))?;
                Ok(Mutation {
                    affected: rows.len(),
                    generated_key: rows.first().and_then(|r| r.get_i64(column)),
                })
            }
        }
    }

    pub fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        debug!(query = sql, "batch");
        self.session
            .execute_batch(sql)
            .map_err(|e| logged(sql, e))
    }

    pub fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        self.session.table_exists(table)
    }

    pub fn column_names(&self, table: &str) -> Result<Vec<String>, StorageError> {
        self.session.column_names(table)
    }

    /// Run `f` inside a transaction. Commits on `Ok`, rolls back on `Err`.
    pub fn in_transaction<T, E>(&self, f: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        self.execute_batch("BEGIN TRANSACTION")?;
        match f(self) {
            Ok(value) => {
                self.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.execute_batch("ROLLBACK") {
                    warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }
}

fn logged(sql: &str, e: StorageError) -> StorageError {
    warn!(query = sql, error = %e, "Statement failed");
    e
}
