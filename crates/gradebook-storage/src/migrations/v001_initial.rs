//! V001: eval_runs table.
//!
//! Column names match stores written by earlier tooling, so an existing
//! ledger file is adopted in place.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS eval_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    wall_clock_time REAL NOT NULL,
    input_tokens INTEGER NOT NULL,
    output_tokens INTEGER NOT NULL,
    eval_results TEXT NOT NULL,
    git_revision TEXT NOT NULL,
    git_diff TEXT NOT NULL DEFAULT '',
    working_directory TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    model TEXT NOT NULL DEFAULT 'claude-haiku-4-5-20251001'
);

CREATE INDEX IF NOT EXISTS idx_eval_runs_revision
    ON eval_runs(git_revision, timestamp);
"#;
