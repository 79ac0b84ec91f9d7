//! PRAGMA configuration applied to every ledger connection.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout.

use gradebook_core::errors::StorageError;
use rusqlite::Connection;

pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        PRAGMA temp_store = MEMORY;
        ",
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("failed to apply pragmas: {e}"),
    })
}

/// Run optimize pragmas before the connection is released.
pub fn optimize_on_close(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA analysis_limit = 400;
        PRAGMA optimize;
        ",
    )
    .map_err(|e| StorageError::SqliteError {
        message: format!("failed to optimize: {e}"),
    })
}
