//! Tests for the rule-outcome model.

use std::str::FromStr;

use gradebook_core::{EvalResult, RuleName, TokenUsage};

#[test]
fn fresh_result_fails_every_rule() {
    let result = EvalResult::new();
    let map = result.to_map();
    assert_eq!(map.len(), 4);
    assert!(map.values().all(|passed| !passed));
}

#[test]
fn rule_name_set_is_stable() {
    let names: Vec<&str> = RuleName::ALL.iter().map(|r| r.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "used_service_skill",
            "used_none_instead_of_optional",
            "used_dataclasses_for_methods",
            "no_constructor_side_effects",
        ]
    );
    let keys: Vec<String> = EvalResult::new().to_map().into_keys().collect();
    let mut expected: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(keys, expected);
}

#[test]
fn marking_flows_into_map() {
    let mut result = EvalResult::new();
    result.mark(RuleName::UsedNoneInsteadOfOptional, true);
    result.used_service_skill.mark(true);

    let map = result.to_map();
    assert_eq!(map["used_none_instead_of_optional"], true);
    assert_eq!(map["used_service_skill"], true);
    assert_eq!(map["used_dataclasses_for_methods"], false);
    assert_eq!(map["no_constructor_side_effects"], false);
}

#[test]
fn rule_name_parses_from_persisted_string() {
    assert_eq!(
        RuleName::from_str("no_constructor_side_effects").unwrap(),
        RuleName::NoConstructorSideEffects
    );
    assert!(RuleName::from_str("used_optional").is_err());
}

#[test]
fn total_input_includes_cache_tokens() {
    let usage = TokenUsage {
        input_tokens: 12,
        cache_read_input_tokens: 3000,
        cache_creation_input_tokens: 450,
        output_tokens: 800,
    };
    assert_eq!(usage.total_input(), 3462);
}
