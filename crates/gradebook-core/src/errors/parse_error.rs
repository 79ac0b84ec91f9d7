//! Errors raised while turning a candidate file into a syntax tree.

use super::error_code::{self, GradebookErrorCode};

/// Reasons a candidate source file could not be analyzed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("source is not valid UTF-8: {message}")]
    Decode { message: String },

    #[error("failed to load grammar: {message}")]
    Grammar { message: String },

    #[error("source has {count} syntax error(s), first at line {first_line}")]
    Syntax { count: u32, first_line: u32 },

    #[error("parser produced no tree")]
    NoTree,
}

impl GradebookErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::FILE_UNAVAILABLE,
            Self::Decode { .. } => error_code::DECODE_ERROR,
            Self::Grammar { .. } | Self::Syntax { .. } | Self::NoTree => error_code::PARSE_ERROR,
        }
    }
}
