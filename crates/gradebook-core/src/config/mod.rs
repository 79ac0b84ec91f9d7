//! Configuration system for gradebook.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod gradebook_config;
pub mod ledger_config;
pub mod oracle_config;
pub mod report_config;
pub mod rules_config;

pub use gradebook_config::{CliOverrides, GradebookConfig};
pub use ledger_config::LedgerConfig;
pub use oracle_config::OracleConfig;
pub use report_config::ReportConfig;
pub use rules_config::RulesConfig;
