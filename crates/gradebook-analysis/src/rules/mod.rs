//! Style rules graded against one candidate Python file.
//!
//! Structural rules are pure tree visitors and never fail: a file that
//! cannot be read, decoded, or parsed is graded as non-compliant.

pub mod constructor_purity;
pub mod nullable;
pub mod record_shape;

use std::path::Path;

use gradebook_core::config::RulesConfig;
use gradebook_core::{EvalResult, RuleName};

use crate::oracle::ReasoningOracle;
use crate::parsers::{self, ClassDef, Parameter, SyntaxNode};

pub use constructor_purity::{check_no_constructor_side_effects, Precheck};
pub use nullable::check_uses_union_none_syntax;
pub use record_shape::check_methods_use_records;

/// Names the structural rules recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    record_decorators: Vec<String>,
    map_types: Vec<String>,
    optional_wrappers: Vec<String>,
    receiver_names: Vec<String>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}

impl RuleSettings {
    pub fn from_config(config: &RulesConfig) -> Self {
        Self {
            record_decorators: config.effective_record_decorators(),
            map_types: config.effective_map_types(),
            optional_wrappers: config.effective_optional_wrappers(),
            receiver_names: config.effective_receiver_names(),
        }
    }

    /// A class is a record type if any decorator names a record factory,
    /// bare (`@dataclass`), qualified (`@dataclasses.dataclass`), or called
    /// (`@dataclass(frozen=True)`).
    pub fn is_record_class(&self, class: &ClassDef) -> bool {
        class.decorators.iter().any(|d| {
            d.target()
                .terminal_name()
                .is_some_and(|name| contains(&self.record_decorators, name))
        })
    }

    /// `dict`, `Dict`, `typing.Dict`, ... as a bare name or attribute.
    pub fn is_map_name(&self, node: &SyntaxNode) -> bool {
        node.terminal_name()
            .is_some_and(|name| contains(&self.map_types, name))
    }

    pub fn is_optional_wrapper(&self, node: &SyntaxNode) -> bool {
        node.terminal_name()
            .is_some_and(|name| contains(&self.optional_wrappers, name))
    }

    pub fn is_receiver(&self, param: &Parameter) -> bool {
        contains(&self.receiver_names, &param.name)
    }
}

fn contains(names: &[String], name: &str) -> bool {
    names.iter().any(|n| n == name)
}

/// Grade the three file-based rules and mark them on `result`.
///
/// The file is parsed once and shared by both structural rules. Without an
/// oracle the constructor rule is decided by its pre-checks alone and
/// otherwise fails closed.
pub fn evaluate_file(
    path: &Path,
    settings: &RuleSettings,
    oracle: Option<&dyn ReasoningOracle>,
    result: &mut EvalResult,
) {
    let tree = match parsers::parse_file(path) {
        Ok(tree) => Some(tree),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "candidate file not analyzable");
            None
        }
    };

    let nullable = tree
        .as_ref()
        .is_some_and(|t| nullable::uses_union_none_syntax(t, settings));
    let records = tree
        .as_ref()
        .is_some_and(|t| record_shape::methods_use_records(t, settings));
    let constructors = match oracle {
        Some(oracle) => check_no_constructor_side_effects(path, oracle),
        None => match constructor_purity::precheck(path) {
            Precheck::Decided(verdict) => verdict,
            Precheck::NeedsOracle(_) => {
                tracing::warn!(
                    path = %path.display(),
                    "constructor rule needs an oracle; none configured"
                );
                false
            }
        },
    };

    for (rule, verdict) in [
        (RuleName::UsedNoneInsteadOfOptional, nullable),
        (RuleName::UsedDataclassesForMethods, records),
        (RuleName::NoConstructorSideEffects, constructors),
    ] {
        tracing::debug!(rule = %rule, path = %path.display(), verdict, "rule verdict");
        result.mark(rule, verdict);
    }
}
