//! Behavioral checks observed from the agent's tool-use stream.

use gradebook_core::{EvalResult, RuleName};
use serde_json::Value;

const SKILL_TOOL: &str = "Skill";
const SERVICE_SKILL: &str = "writing-python-services";

/// Inspect one tool invocation and mark any behavioral check it satisfies.
///
/// Returns `true` if a check was marked.
pub fn observe_tool_use(result: &mut EvalResult, tool_name: &str, input: &Value) -> bool {
    if tool_name != SKILL_TOOL {
        return false;
    }
    let skill = input.get("skill").and_then(Value::as_str).unwrap_or("");
    if !skill.contains(SERVICE_SKILL) {
        return false;
    }
    tracing::debug!(skill, "observed service skill use");
    result.mark(RuleName::UsedServiceSkill, true);
    true
}
