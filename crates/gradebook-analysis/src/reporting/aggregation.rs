//! Per-rule pass rates over stored runs, grouped by revision or model.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use gradebook_core::EvalRunRecord;
use serde::Serialize;

/// Passes out of total for one rule within one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleTally {
    pub passed: u32,
    pub total: u32,
}

impl RuleTally {
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        }
    }

    /// Percentage in `0.0..=100.0`; `0.0` for an empty tally.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.passed) * 100.0 / f64::from(self.total)
    }
}

/// The run attribute groups are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    Revision,
    Model,
}

impl Grouping {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Revision => "revision",
            Self::Model => "model",
        }
    }

    fn key<'r>(&self, record: &'r EvalRunRecord) -> &'r str {
        match self {
            Self::Revision => &record.run.revision,
            Self::Model => &record.run.model,
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "revision" => Ok(Self::Revision),
            "model" => Ok(Self::Model),
            other => Err(format!("unknown grouping: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub runs: usize,
    /// Timestamp of the group's most recent run; groups sort on it.
    pub most_recent: NaiveDateTime,
    /// Rule name → tally, sorted by rule name.
    pub rules: BTreeMap<String, RuleTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub grouping: Grouping,
    /// Every run handed in, including excluded ones.
    pub total_runs: usize,
    /// Runs dropped because their diff was blank.
    pub excluded_runs: usize,
    /// Most recent group first.
    pub groups: Vec<GroupSummary>,
}

impl LedgerSummary {
    pub fn counted_runs(&self) -> usize {
        self.total_runs - self.excluded_runs
    }
}

/// Group runs and tally each rule. Runs with a blank diff made no code
/// change and are left out of every tally.
pub fn summarize(records: &[EvalRunRecord], grouping: Grouping) -> LedgerSummary {
    let mut groups: HashMap<&str, GroupSummary> = HashMap::new();
    let mut excluded_runs = 0;

    for record in records {
        if !record.run.has_diff() {
            excluded_runs += 1;
            continue;
        }
        let key = grouping.key(record);
        let group = groups.entry(key).or_insert_with(|| GroupSummary {
            key: key.to_string(),
            runs: 0,
            most_recent: record.run.timestamp,
            rules: BTreeMap::new(),
        });
        group.runs += 1;
        group.most_recent = group.most_recent.max(record.run.timestamp);
        for (rule, passed) in &record.run.eval_results {
            group.rules.entry(rule.clone()).or_default().record(*passed);
        }
    }

    let mut groups: Vec<GroupSummary> = groups.into_values().collect();
    groups.sort_by(|a, b| {
        b.most_recent
            .cmp(&a.most_recent)
            .then_with(|| a.key.cmp(&b.key))
    });

    if excluded_runs > 0 {
        tracing::debug!(excluded_runs, "excluded runs with empty diffs");
    }

    LedgerSummary {
        grouping,
        total_runs: records.len(),
        excluded_runs,
        groups,
    }
}

pub fn summarize_by_revision(records: &[EvalRunRecord]) -> LedgerSummary {
    summarize(records, Grouping::Revision)
}

/// Compare model variants across all revisions.
pub fn summarize_by_model(records: &[EvalRunRecord]) -> LedgerSummary {
    summarize(records, Grouping::Model)
}
