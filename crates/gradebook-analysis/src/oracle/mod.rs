//! Reasoning oracle used by behavioral rules that cannot be decided from the
//! syntax tree alone.

pub mod command;
pub mod guarded;

pub use command::CommandOracle;
pub use guarded::{GuardedOracle, OraclePolicy};

use std::time::Duration;

use gradebook_core::errors::OracleError;

/// Answers a natural-language prompt with free text.
///
/// Implementations must be callable from a worker thread; [`GuardedOracle`]
/// runs each attempt off the caller's thread to enforce its timeout.
pub trait ReasoningOracle: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, OracleError>;

    /// Like [`complete`](Self::complete), but any work still running when
    /// `timeout` elapses should be stopped. The default cannot cancel and
    /// just calls `complete`.
    fn complete_within(&self, prompt: &str, _timeout: Duration) -> Result<String, OracleError> {
        self.complete(prompt)
    }
}
