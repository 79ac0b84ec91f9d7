//! Two-valued compliance check.

use serde::{Deserialize, Serialize};

/// Live state of a [`Check`]: still at its default, or explicitly marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckState {
    Unset,
    Marked(bool),
}

/// A single compliance check.
///
/// A check starts at `default` and passes when its live value equals
/// `expected`. When `default == expected` an unmarked check passes
/// vacuously ("passes unless violated"); otherwise it only passes once
/// the expected value has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    default: bool,
    expected: bool,
    state: CheckState,
}

impl Check {
    pub const fn new(default: bool, expected: bool) -> Self {
        Self {
            default,
            expected,
            state: CheckState::Unset,
        }
    }

    /// Record an observed value. Last write wins.
    pub fn mark(&mut self, value: bool) {
        self.state = CheckState::Marked(value);
    }

    /// The live value: the last marked value, or the default.
    pub fn value(&self) -> bool {
        match self.state {
            CheckState::Unset => self.default,
            CheckState::Marked(value) => value,
        }
    }

    pub fn did_pass(&self) -> bool {
        self.value() == self.expected
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_marked(&self) -> bool {
        matches!(self.state, CheckState::Marked(_))
    }
}
