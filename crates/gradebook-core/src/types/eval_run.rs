//! Eval-run records as written to and read from the ledger.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::eval_result::RuleOutcomes;

/// One evaluation run. Built once by the orchestrator, persisted once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRun {
    /// Wall-clock duration of the run, in seconds.
    pub wall_clock_time: f64,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub eval_results: RuleOutcomes,
    /// Opaque VCS revision id; stored verbatim.
    pub revision: String,
    /// Diff of the working copy at evaluation time. Empty for no-op runs.
    pub diff: String,
    pub working_directory: String,
    pub timestamp: NaiveDateTime,
    pub model: String,
}

impl EvalRun {
    /// Runs without an actual code change are excluded from statistics.
    pub fn has_diff(&self) -> bool {
        !self.diff.trim().is_empty()
    }
}

/// An [`EvalRun`] together with the identity the ledger assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRunRecord {
    pub id: i64,
    #[serde(flatten)]
    pub run: EvalRun,
}
