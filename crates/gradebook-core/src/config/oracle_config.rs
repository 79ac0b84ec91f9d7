//! Reasoning-oracle configuration (constructor-purity rule).

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OracleConfig {
    /// External command that reads a prompt on stdin and answers on stdout.
    pub command: Option<String>,
    /// Per-attempt timeout in seconds. Default: 120.
    pub timeout_secs: Option<u64>,
    /// Additional attempts after the first failure. Default: 1.
    pub max_retries: Option<u32>,
    /// Initial backoff between attempts, doubled each retry. Default: 500ms.
    pub backoff_ms: Option<u64>,
}

impl OracleConfig {
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(120))
    }

    pub fn effective_max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(1)
    }

    pub fn effective_backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms.unwrap_or(500))
    }
}
