//! Top-level error aggregating subsystem errors via `From` conversions.

use super::error_code::GradebookErrorCode;
use super::{ConfigError, OracleError, ParseError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum GradebookError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

impl GradebookErrorCode for GradebookError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Oracle(e) => e.error_code(),
        }
    }
}
