//! Query modules, one per table.

pub mod eval_runs;
