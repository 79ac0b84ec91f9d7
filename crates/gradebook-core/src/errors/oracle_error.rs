//! Errors from the reasoning oracle used by behavioral rules.

use super::error_code::{self, GradebookErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle transport failed: {message}")]
    Transport { message: String },

    #[error("oracle did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("oracle returned an empty response")]
    EmptyResponse,
}

impl GradebookErrorCode for OracleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::ORACLE_TIMEOUT,
            Self::Transport { .. } | Self::EmptyResponse => error_code::ORACLE_ERROR,
        }
    }
}
