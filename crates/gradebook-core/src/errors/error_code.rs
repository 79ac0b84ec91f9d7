//! Stable error codes for every error enum.

/// Every error enum implements this to expose a structured code string
/// that callers can match on without parsing messages.
pub trait GradebookErrorCode {
    /// Returns the error code string (e.g., "PARSE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const DECODE_ERROR: &str = "DECODE_ERROR";
pub const FILE_UNAVAILABLE: &str = "FILE_UNAVAILABLE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_ROW: &str = "CORRUPT_ROW";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const ORACLE_ERROR: &str = "ORACLE_ERROR";
pub const ORACLE_TIMEOUT: &str = "ORACLE_TIMEOUT";
