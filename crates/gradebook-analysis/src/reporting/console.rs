//! Console reporter: per-group pass-rate table for the terminal.

use std::fmt::Write;

use super::aggregation::{GroupSummary, Grouping, LedgerSummary, RuleTally};
use super::Reporter;

const RULE_WIDTH: usize = 40;
const RULE_LINE: usize = 80;

pub struct ConsoleReporter {
    pub use_color: bool,
    /// Characters of a revision id to show.
    pub revision_width: usize,
}

impl ConsoleReporter {
    pub fn new(use_color: bool, revision_width: usize) -> Self {
        Self {
            use_color,
            revision_width,
        }
    }

    fn rate_color(&self, tally: &RuleTally) -> &'static str {
        if !self.use_color {
            return "";
        }
        match tally.pass_rate() {
            r if r >= 100.0 => "\x1b[32m", // green
            r if r >= 50.0 => "\x1b[33m",  // yellow
            _ => "\x1b[31m",               // red
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }

    fn heading(&self, grouping: Grouping, key: &str) -> String {
        match grouping {
            Grouping::Revision => {
                let short: String = key.chars().take(self.revision_width).collect();
                format!("Revision: {short}")
            }
            Grouping::Model => format!("Model: {key}"),
        }
    }

    fn write_group(
        &self,
        out: &mut String,
        grouping: Grouping,
        group: &GroupSummary,
    ) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "{}", self.heading(grouping, &group.key))?;
        writeln!(out, "Total runs: {}", group.runs)?;
        writeln!(out, "Most recent: {}", group.most_recent)?;
        writeln!(out)?;
        writeln!(out, "Eval Results:")?;
        for (rule, tally) in &group.rules {
            writeln!(
                out,
                "  {:<width$} {:3}/{:3} ({}{:5.1}%{})",
                rule,
                tally.passed,
                tally.total,
                self.rate_color(tally),
                tally.pass_rate(),
                self.color_end(),
                width = RULE_WIDTH,
            )?;
        }
        writeln!(out, "{}", "-".repeat(RULE_LINE))
    }

    fn render(&self, summary: &LedgerSummary) -> Result<String, std::fmt::Error> {
        let mut out = String::new();

        if summary.total_runs == 0 {
            writeln!(out, "No eval runs found in the database.")?;
            return Ok(out);
        }
        if summary.groups.is_empty() {
            writeln!(out, "No eval runs with git diffs found in the database.")?;
            return Ok(out);
        }
        if summary.excluded_runs > 0 {
            writeln!(
                out,
                "Filtered out {} eval run(s) with empty git diffs\n",
                summary.excluded_runs
            )?;
        }

        let noun = match (summary.grouping, summary.groups.len()) {
            (Grouping::Revision, 1) => "revision",
            (Grouping::Revision, _) => "revisions",
            (Grouping::Model, 1) => "model",
            (Grouping::Model, _) => "models",
        };
        writeln!(
            out,
            "Found {} eval runs (with git diffs) across {} {noun}\n",
            summary.counted_runs(),
            summary.groups.len()
        )?;
        writeln!(out, "{}", "=".repeat(RULE_LINE))?;

        for group in &summary.groups {
            self.write_group(&mut out, summary.grouping, group)?;
        }
        Ok(out)
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true, 12)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, summary: &LedgerSummary) -> Result<String, String> {
        self.render(summary).map_err(|e| e.to_string())
    }
}
