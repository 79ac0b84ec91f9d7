//! The revision ledger: lazily connected store of eval runs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gradebook_core::errors::StorageError;
use gradebook_core::{EvalRun, EvalRunRecord};
use rusqlite::Connection;

use crate::connection::{self, pragmas, writer};
use crate::queries::eval_runs;

/// Durable, queryable storage of [`EvalRun`] records.
///
/// Constructing a ledger only records its path. The connection is opened,
/// and the schema created or migrated, on the first read or write. Writes
/// assume a single writer process per store.
pub struct Ledger {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl Ledger {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the storage handle has been created yet.
    pub fn is_connected(&self) -> bool {
        self.conn.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Run `f` with the connection, opening it on first use.
    fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StorageError>,
    {
        let mut guard = self.conn.lock().map_err(|_| StorageError::SqliteError {
            message: "ledger lock poisoned".to_string(),
        })?;
        if guard.is_none() {
            tracing::debug!(path = %self.path.display(), "opening ledger");
            *guard = Some(connection::connect(&self.path)?);
        }
        match guard.as_mut() {
            Some(conn) => f(conn),
            None => Err(StorageError::SqliteError {
                message: "ledger connection unavailable".to_string(),
            }),
        }
    }

    /// Append a run. The row is either fully visible afterwards or absent.
    pub fn append(&self, run: &EvalRun) -> Result<i64, StorageError> {
        let id = self.with_conn(|conn| {
            writer::with_immediate_transaction(conn, |tx| eval_runs::insert_run(tx, run))
        })?;
        tracing::info!(id, revision = %run.revision, model = %run.model, "logged eval run");
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<Option<EvalRunRecord>, StorageError> {
        self.with_conn(|conn| eval_runs::get_run(conn, id))
    }

    /// All runs, most recently inserted first.
    pub fn list_all(&self) -> Result<Vec<EvalRunRecord>, StorageError> {
        self.with_conn(|conn| eval_runs::query_all(conn))
    }

    /// Runs with exactly this revision id, most recent timestamp first.
    pub fn list_by_revision(&self, revision: &str) -> Result<Vec<EvalRunRecord>, StorageError> {
        self.with_conn(|conn| eval_runs::query_by_revision(conn, revision))
    }

    /// Distinct revision ids, most recently evaluated first.
    pub fn list_revisions(&self) -> Result<Vec<String>, StorageError> {
        self.with_conn(|conn| eval_runs::distinct_revisions(conn))
    }

    pub fn count(&self) -> Result<i64, StorageError> {
        self.with_conn(|conn| eval_runs::count(conn))
    }

    /// Returns true iff a row existed and was removed.
    pub fn delete(&self, id: i64) -> Result<bool, StorageError> {
        self.with_conn(|conn| {
            writer::with_immediate_transaction(conn, |tx| eval_runs::delete_run(tx, id))
        })
    }

    /// Remove every run. Returns the number removed.
    pub fn clear(&self) -> Result<usize, StorageError> {
        let removed = self.with_conn(|conn| {
            writer::with_immediate_transaction(conn, |tx| eval_runs::clear_runs(tx))
        })?;
        tracing::info!(removed, "cleared ledger");
        Ok(removed)
    }

    /// Release the storage handle. A no-op if it was never opened.
    pub fn close(self) -> Result<(), StorageError> {
        let conn = self.conn.into_inner().map_err(|_| StorageError::SqliteError {
            message: "ledger lock poisoned".to_string(),
        })?;
        let Some(conn) = conn else {
            return Ok(());
        };
        if let Err(e) = pragmas::optimize_on_close(&conn) {
            tracing::warn!(error = %e, "optimize on close failed");
        }
        conn.close().map_err(|(_, e)| StorageError::SqliteError {
            message: format!("close: {e}"),
        })
    }
}
