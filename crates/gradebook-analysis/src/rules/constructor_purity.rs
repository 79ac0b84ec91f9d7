//! Constructors must not perform I/O.
//!
//! This cannot be decided from the tree alone, so the file text is judged by
//! a [`ReasoningOracle`]. Cheap text pre-checks run first and skip the
//! oracle when there is nothing to judge.

use std::path::Path;

use crate::oracle::ReasoningOracle;

const CONSTRUCTOR_MARKER: &str = "__init__";

/// Outcome of the text pre-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// Verdict reached without the oracle.
    Decided(bool),
    /// File text that must be judged by the oracle.
    NeedsOracle(String),
}

/// Missing or undecodable → fail; blank or constructor-free → pass.
pub fn precheck(path: &Path) -> Precheck {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "constructor rule: not readable");
            return Precheck::Decided(false);
        }
    };
    precheck_source(content)
}

pub fn precheck_source(content: String) -> Precheck {
    if content.trim().is_empty() || !content.contains(CONSTRUCTOR_MARKER) {
        return Precheck::Decided(true);
    }
    Precheck::NeedsOracle(content)
}

pub fn build_prompt(content: &str) -> String {
    format!(
        r#"Analyze this Python code to check if it follows the guideline: "No side effects in constructor".

Guidelines:
- __init__ methods should NOT perform IO operations (file operations, network calls, database operations)
- IO operations should be deferred to @cached_property decorated methods and lazily evaluated
- Simple attribute assignments in __init__ are fine
- If there are no __init__ methods in the code, there can be no violation (respond YES)

Code to analyze:
```python
{content}
```

Does this code follow the guideline? Respond with ONLY "YES" or "NO" followed by a brief explanation.
- YES means the code follows the guideline (no IO in __init__, or no __init__ methods at all)
- NO means the code violates the guideline (has IO operations in __init__)
"#
    )
}

/// Affirmative iff the trimmed, uppercased answer starts with `YES`.
pub fn parse_verdict(response: &str) -> bool {
    response.trim().to_uppercase().starts_with("YES")
}

/// `true` if no constructor in the file performs I/O.
///
/// Oracle failures grade the file as non-compliant.
pub fn check_no_constructor_side_effects(path: &Path, oracle: &dyn ReasoningOracle) -> bool {
    let content = match precheck(path) {
        Precheck::Decided(verdict) => return verdict,
        Precheck::NeedsOracle(content) => content,
    };

    match oracle.complete(&build_prompt(&content)) {
        Ok(response) => {
            let verdict = parse_verdict(&response);
            tracing::debug!(path = %path.display(), verdict, "constructor rule: oracle answered");
            verdict
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "constructor rule: oracle failed");
            false
        }
    }
}
