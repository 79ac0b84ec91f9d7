//! JSON reporter: machine-readable summary with computed pass rates.

use serde_json::{json, Value};

use super::aggregation::{GroupSummary, LedgerSummary};
use super::Reporter;

pub struct JsonReporter;

fn group_to_json(group: &GroupSummary) -> Value {
    let rules: serde_json::Map<String, Value> = group
        .rules
        .iter()
        .map(|(name, tally)| {
            (
                name.clone(),
                json!({
                    "passed": tally.passed,
                    "total": tally.total,
                    "pass_rate": tally.pass_rate(),
                }),
            )
        })
        .collect();

    json!({
        "key": group.key,
        "runs": group.runs,
        "most_recent": group.most_recent.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        "rules": rules,
    })
}

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, summary: &LedgerSummary) -> Result<String, String> {
        let report = json!({
            "grouping": summary.grouping,
            "total_runs": summary.total_runs,
            "excluded_runs": summary.excluded_runs,
            "groups": summary.groups.iter().map(group_to_json).collect::<Vec<_>>(),
        });
        serde_json::to_string_pretty(&report).map_err(|e| format!("JSON serialization failed: {e}"))
    }
}
