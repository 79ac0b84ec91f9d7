//! Error handling for gradebook.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod gradebook_error;
pub mod oracle_error;
pub mod parse_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::GradebookErrorCode;
pub use gradebook_error::GradebookError;
pub use oracle_error::OracleError;
pub use parse_error::ParseError;
pub use storage_error::StorageError;
