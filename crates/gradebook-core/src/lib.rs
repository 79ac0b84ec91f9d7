//! Core of the gradebook: rule-outcome model, eval-run records, errors,
//! layered configuration, and tracing setup shared by every other crate.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use types::{Check, EvalResult, EvalRun, EvalRunRecord, RuleName, RuleOutcomes, TokenUsage};
