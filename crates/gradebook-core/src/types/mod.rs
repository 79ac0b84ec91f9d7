//! Rule-outcome model and eval-run records.

pub mod check;
pub mod eval_result;
pub mod eval_run;
pub mod usage;

pub use check::{Check, CheckState};
pub use eval_result::{EvalResult, RuleName, RuleOutcomes};
pub use eval_run::{EvalRun, EvalRunRecord};
pub use usage::TokenUsage;
