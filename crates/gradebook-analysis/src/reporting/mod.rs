//! Reporters: output formats for ledger summaries.

pub mod aggregation;
pub mod console;
pub mod json;

pub use aggregation::{
    summarize, summarize_by_model, summarize_by_revision, GroupSummary, Grouping, LedgerSummary,
    RuleTally,
};

use gradebook_core::config::ReportConfig;

/// Trait for report generation.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, summary: &LedgerSummary) -> Result<String, String>;
}

/// Create a reporter by format name.
pub fn create_reporter(format: &str, config: &ReportConfig) -> Option<Box<dyn Reporter>> {
    match format {
        "console" => Some(Box::new(console::ConsoleReporter::new(
            config.effective_color(),
            config.effective_revision_width(),
        ))),
        "json" => Some(Box::new(json::JsonReporter)),
        _ => None,
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["console", "json"]
}
