//! Ledger (SQLite store) configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Model identifier assigned to rows written before the `model` column existed.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";

/// Default ledger file name, relative to the working root.
pub const DEFAULT_LEDGER_FILE: &str = "evals.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path of the SQLite ledger. Default: `evals.db`.
    pub path: Option<PathBuf>,
    /// Model recorded when a run does not name one.
    pub default_model: Option<String>,
}

impl LedgerConfig {
    pub fn effective_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_FILE))
    }

    pub fn effective_default_model(&self) -> &str {
        self.default_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}
