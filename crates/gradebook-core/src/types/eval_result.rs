//! Fixed set of rule checks for one evaluation run.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::check::Check;

/// Serialized rule outcomes: rule name → passed.
pub type RuleOutcomes = BTreeMap<String, bool>;

/// The rules graded for every run. The string names are persisted in the
/// ledger and must stay stable so runs remain comparable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    /// The agent invoked the service-writing skill during the run.
    UsedServiceSkill,
    /// Nullable types use `X | None`, never the optional wrapper.
    UsedNoneInsteadOfOptional,
    /// Method signatures use record types instead of generic maps.
    UsedDataclassesForMethods,
    /// Constructors perform no I/O.
    NoConstructorSideEffects,
}

impl RuleName {
    pub const ALL: [RuleName; 4] = [
        RuleName::UsedServiceSkill,
        RuleName::UsedNoneInsteadOfOptional,
        RuleName::UsedDataclassesForMethods,
        RuleName::NoConstructorSideEffects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsedServiceSkill => "used_service_skill",
            Self::UsedNoneInsteadOfOptional => "used_none_instead_of_optional",
            Self::UsedDataclassesForMethods => "used_dataclasses_for_methods",
            Self::NoConstructorSideEffects => "no_constructor_side_effects",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| format!("unknown rule: {s}"))
    }
}

/// One [`Check`] per rule. Every check starts failing and must be marked
/// `true` by the rule engine or the behavioral observer to pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResult {
    pub used_service_skill: Check,
    pub used_none_instead_of_optional: Check,
    pub used_dataclasses_for_methods: Check,
    pub no_constructor_side_effects: Check,
}

impl Default for EvalResult {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalResult {
    pub const fn new() -> Self {
        Self {
            used_service_skill: Check::new(false, true),
            used_none_instead_of_optional: Check::new(false, true),
            used_dataclasses_for_methods: Check::new(false, true),
            no_constructor_side_effects: Check::new(false, true),
        }
    }

    pub fn check(&self, rule: RuleName) -> &Check {
        match rule {
            RuleName::UsedServiceSkill => &self.used_service_skill,
            RuleName::UsedNoneInsteadOfOptional => &self.used_none_instead_of_optional,
            RuleName::UsedDataclassesForMethods => &self.used_dataclasses_for_methods,
            RuleName::NoConstructorSideEffects => &self.no_constructor_side_effects,
        }
    }

    pub fn check_mut(&mut self, rule: RuleName) -> &mut Check {
        match rule {
            RuleName::UsedServiceSkill => &mut self.used_service_skill,
            RuleName::UsedNoneInsteadOfOptional => &mut self.used_none_instead_of_optional,
            RuleName::UsedDataclassesForMethods => &mut self.used_dataclasses_for_methods,
            RuleName::NoConstructorSideEffects => &mut self.no_constructor_side_effects,
        }
    }

    pub fn mark(&mut self, rule: RuleName, value: bool) {
        self.check_mut(rule).mark(value);
    }

    /// Flatten to the persisted rule-name → passed mapping.
    pub fn to_map(&self) -> RuleOutcomes {
        RuleName::ALL
            .iter()
            .map(|rule| (rule.as_str().to_string(), self.check(*rule).did_pass()))
            .collect()
    }
}
