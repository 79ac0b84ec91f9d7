//! Schema migrations.
//!
//! Versioned with `PRAGMA user_version`; additive columns are detected with
//! `PRAGMA table_info` so that running initialization against any earlier
//! store only ever adds what is missing. Existing columns and row values
//! are never altered.

pub mod v001_initial;
pub mod v002_additive_columns;

use std::collections::HashSet;

use gradebook_core::errors::StorageError;
use rusqlite::Connection;

/// Schema version written after a successful run.
pub const SCHEMA_VERSION: u32 = 2;

const LEDGER_TABLE: &str = "eval_runs";

/// Run all pending migrations. Idempotent.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let version = current_version(conn)?;

    if version < 1 {
        conn.execute_batch(v001_initial::MIGRATION_SQL)
            .map_err(|e| StorageError::MigrationFailed {
                version: 1,
                message: e.to_string(),
            })?;
        tracing::info!(version = 1, "applied migration");
    }

    let added = add_missing_columns(conn)?;
    if !added.is_empty() {
        tracing::info!(version = 2, columns = ?added, "added ledger columns");
    }

    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| StorageError::MigrationFailed {
                version: SCHEMA_VERSION,
                message: e.to_string(),
            })?;
    }

    Ok(())
}

fn add_missing_columns(conn: &Connection) -> Result<Vec<&'static str>, StorageError> {
    let existing = column_names(conn)?;
    let mut added = Vec::new();

    for column in v002_additive_columns::COLUMNS {
        if existing.contains(column.name) {
            continue;
        }
        conn.execute_batch(column.ddl)
            .map_err(|e| StorageError::MigrationFailed {
                version: 2,
                message: format!("add column {}: {e}", column.name),
            })?;
        added.push(column.name);
    }

    Ok(added)
}

/// Names of the columns currently present on the ledger table.
pub fn column_names(conn: &Connection) -> Result<HashSet<String>, StorageError> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({LEDGER_TABLE})"))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;

    names
        .collect::<Result<HashSet<_>, _>>()
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
