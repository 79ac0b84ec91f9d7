//! Connection setup: opening, pragmas, and write transactions.

pub mod pragmas;
pub mod writer;

use std::path::Path;

use gradebook_core::errors::StorageError;
use rusqlite::Connection;

use self::pragmas::apply_pragmas;
use crate::migrations;

/// Open a connection at `path`, apply pragmas, and bring the schema up to date.
pub fn connect(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
        message: format!("open {}: {e}", path.display()),
    })?;
    apply_pragmas(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
