//! Rule-engine configuration: the names each structural rule looks for.

use serde::{Deserialize, Serialize};

/// Configuration for the structural rules.
///
/// Empty lists mean "use the built-in names".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Decorators marking a class as a plain data record. Default: `["dataclass"]`.
    pub record_decorators: Vec<String>,
    /// Generic key/value map type names. Default: `["dict", "Dict"]`.
    pub map_types: Vec<String>,
    /// Wrapper types that encode "may be absent". Default: `["Optional"]`.
    pub optional_wrappers: Vec<String>,
    /// Implicit receiver parameter names. Default: `["self", "cls"]`.
    pub receiver_names: Vec<String>,
}

fn or_defaults(values: &[String], defaults: &[&str]) -> Vec<String> {
    if values.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        values.to_vec()
    }
}

impl RulesConfig {
    pub fn effective_record_decorators(&self) -> Vec<String> {
        or_defaults(&self.record_decorators, &["dataclass"])
    }

    pub fn effective_map_types(&self) -> Vec<String> {
        or_defaults(&self.map_types, &["dict", "Dict"])
    }

    pub fn effective_optional_wrappers(&self) -> Vec<String> {
        or_defaults(&self.optional_wrappers, &["Optional"])
    }

    pub fn effective_receiver_names(&self) -> Vec<String> {
        or_defaults(&self.receiver_names, &["self", "cls"])
    }
}
