//! V002: columns introduced after the first release of the ledger.
//!
//! Applied by column detection rather than by version number: a store is
//! checked on every open and only the missing columns are added.

/// A column that may be absent from stores created before it existed.
#[derive(Debug, Clone, Copy)]
pub struct AdditiveColumn {
    pub name: &'static str,
    pub ddl: &'static str,
}

pub const COLUMNS: &[AdditiveColumn] = &[
    AdditiveColumn {
        name: "git_diff",
        ddl: "ALTER TABLE eval_runs ADD COLUMN git_diff TEXT NOT NULL DEFAULT ''",
    },
    AdditiveColumn {
        name: "model",
        ddl: "ALTER TABLE eval_runs ADD COLUMN model TEXT NOT NULL DEFAULT 'claude-haiku-4-5-20251001'",
    },
];
