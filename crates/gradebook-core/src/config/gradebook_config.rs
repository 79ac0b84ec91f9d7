//! Top-level gradebook configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LedgerConfig, OracleConfig, ReportConfig, RulesConfig};
use crate::errors::ConfigError;

/// Project-level config file name, looked up in the working root.
pub const PROJECT_CONFIG_FILE: &str = "gradebook.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GRADEBOOK_*`)
/// 3. Project config (`gradebook.toml` in the working root)
/// 4. User config (`~/.gradebook/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GradebookConfig {
    pub ledger: LedgerConfig,
    pub rules: RulesConfig,
    pub oracle: OracleConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub ledger_path: Option<PathBuf>,
    pub oracle_command: Option<String>,
    pub oracle_timeout_secs: Option<u64>,
    pub report_color: Option<bool>,
}

impl GradebookConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Only a parse failure is fatal here.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &GradebookConfig) -> Result<(), ConfigError> {
        if config.oracle.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "oracle.timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.report.revision_width == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "report.revision_width".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (field, values) in [
            ("rules.record_decorators", &config.rules.record_decorators),
            ("rules.map_types", &config.rules.map_types),
            ("rules.optional_wrappers", &config.rules.optional_wrappers),
        ] {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "names must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.gradebook/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut GradebookConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: GradebookConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut GradebookConfig, other: &GradebookConfig) {
        // Ledger
        if other.ledger.path.is_some() {
            base.ledger.path = other.ledger.path.clone();
        }
        if other.ledger.default_model.is_some() {
            base.ledger.default_model = other.ledger.default_model.clone();
        }

        // Rules
        if !other.rules.record_decorators.is_empty() {
            base.rules.record_decorators = other.rules.record_decorators.clone();
        }
        if !other.rules.map_types.is_empty() {
            base.rules.map_types = other.rules.map_types.clone();
        }
        if !other.rules.optional_wrappers.is_empty() {
            base.rules.optional_wrappers = other.rules.optional_wrappers.clone();
        }
        if !other.rules.receiver_names.is_empty() {
            base.rules.receiver_names = other.rules.receiver_names.clone();
        }

        // Oracle
        if other.oracle.command.is_some() {
            base.oracle.command = other.oracle.command.clone();
        }
        if other.oracle.timeout_secs.is_some() {
            base.oracle.timeout_secs = other.oracle.timeout_secs;
        }
        if other.oracle.max_retries.is_some() {
            base.oracle.max_retries = other.oracle.max_retries;
        }
        if other.oracle.backoff_ms.is_some() {
            base.oracle.backoff_ms = other.oracle.backoff_ms;
        }

        // Report
        if other.report.revision_width.is_some() {
            base.report.revision_width = other.report.revision_width;
        }
        if other.report.color.is_some() {
            base.report.color = other.report.color;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `GRADEBOOK_LEDGER_PATH`, `GRADEBOOK_ORACLE_TIMEOUT_SECS`, etc.
    fn apply_env_overrides(config: &mut GradebookConfig) {
        if let Ok(val) = std::env::var("GRADEBOOK_LEDGER_PATH") {
            config.ledger.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("GRADEBOOK_DEFAULT_MODEL") {
            config.ledger.default_model = Some(val);
        }
        if let Ok(val) = std::env::var("GRADEBOOK_ORACLE_COMMAND") {
            config.oracle.command = Some(val);
        }
        if let Ok(val) = std::env::var("GRADEBOOK_ORACLE_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.oracle.timeout_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GRADEBOOK_ORACLE_MAX_RETRIES") {
            if let Ok(v) = val.parse::<u32>() {
                config.oracle.max_retries = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GRADEBOOK_REPORT_COLOR") {
            if let Ok(v) = val.parse::<bool>() {
                config.report.color = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut GradebookConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.ledger_path {
            config.ledger.path = Some(v.clone());
        }
        if let Some(ref v) = cli.oracle_command {
            config.oracle.command = Some(v.clone());
        }
        if let Some(v) = cli.oracle_timeout_secs {
            config.oracle.timeout_secs = Some(v);
        }
        if let Some(v) = cli.report_color {
            config.report.color = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.gradebook/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".gradebook"))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
