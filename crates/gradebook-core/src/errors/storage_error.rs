//! Storage-layer errors for SQLite operations.

use super::error_code::{self, GradebookErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("row {id} is corrupt: {message}")]
    CorruptRow { id: i64, message: String },
}

impl GradebookErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptRow { .. } => error_code::CORRUPT_ROW,
        }
    }
}
