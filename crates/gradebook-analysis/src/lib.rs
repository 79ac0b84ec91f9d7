//! Analysis side of gradebook: parses candidate Python files into a typed
//! syntax tree, grades them against the style rules, and summarizes stored
//! runs into per-rule pass rates.

pub mod observation;
pub mod oracle;
pub mod parsers;
pub mod reporting;
pub mod rules;

pub use rules::{evaluate_file, RuleSettings};
