//! Reporting configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Characters of the revision id shown in console output. Default: 12.
    pub revision_width: Option<usize>,
    /// Emit ANSI colors in console output. Default: true.
    pub color: Option<bool>,
}

impl ReportConfig {
    pub fn effective_revision_width(&self) -> usize {
        self.revision_width.unwrap_or(12)
    }

    pub fn effective_color(&self) -> bool {
        self.color.unwrap_or(true)
    }
}
