//! Drives the `gradebook` binary against a throwaway ledger.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn gradebook(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gradebook"))
        .arg("--config-root")
        .arg(root)
        .arg("--no-color")
        .args(args)
        .current_dir(root)
        .env("HOME", root)
        .env_remove("USERPROFILE")
        .env_remove("GRADEBOOK_LEDGER_PATH")
        .env_remove("GRADEBOOK_ORACLE_COMMAND")
        .env_remove("GRADEBOOK_DEFAULT_MODEL")
        .output()
        .expect("failed to run gradebook")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("good.py"),
        "from dataclasses import dataclass\n\n@dataclass\nclass User:\n    name: str | None\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("bad.py"),
        "from typing import Optional\n\ndef load(key: Optional[str]) -> dict:\n    return {}\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("change.diff"), "+name: str | None\n").unwrap();
    dir
}

#[test]
fn check_prints_rule_outcomes() {
    let dir = workspace();
    let output = gradebook(dir.path(), &["check", "bad.py"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["used_none_instead_of_optional"], false);
    assert_eq!(value["used_dataclasses_for_methods"], false);
    assert_eq!(value["no_constructor_side_effects"], true);
    assert_eq!(value["used_service_skill"], false);
}

#[test]
fn record_list_and_stats() {
    let dir = workspace();
    let good = dir.path().join("good.py");
    let diff = dir.path().join("change.diff");

    for _ in 0..2 {
        let output = gradebook(
            dir.path(),
            &[
                "record",
                good.to_str().unwrap(),
                "--revision",
                "abc123def4567890",
                "--diff-file",
                diff.to_str().unwrap(),
                "--input-tokens",
                "10",
                "--cache-read-tokens",
                "5",
                "--used-skill",
            ],
        );
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    }
    // No diff: stored but left out of stats.
    let output = gradebook(
        dir.path(),
        &["record", good.to_str().unwrap(), "--revision", "abc123def4567890"],
    );
    assert_eq!(stdout(&output).trim(), "3");
    assert!(dir.path().join("evals.db").exists());

    let listed = stdout(&gradebook(dir.path(), &["list"]));
    assert_eq!(listed.lines().count(), 3);
    assert!(listed.lines().next().unwrap().trim_start().starts_with('3'));

    let shown = stdout(&gradebook(dir.path(), &["show", "1"]));
    let record: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(record["input_tokens"], 15);
    assert_eq!(record["model"], "claude-haiku-4-5-20251001");
    assert_eq!(record["eval_results"]["used_service_skill"], true);

    let stats = stdout(&gradebook(dir.path(), &["stats"]));
    assert!(stats.contains("Filtered out 1 eval run(s) with empty git diffs"));
    assert!(stats.contains("Revision: abc123def456\n"));
    assert!(stats.contains("2/  2 (100.0%)"));

    let json = stdout(&gradebook(dir.path(), &["stats", "--by", "model", "--format", "json"]));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["grouping"], "model");
    assert_eq!(value["excluded_runs"], 1);
}

#[test]
fn delete_and_clear() {
    let dir = workspace();
    let good = dir.path().join("good.py");
    for _ in 0..2 {
        gradebook(dir.path(), &["record", good.to_str().unwrap(), "--revision", "r1"]);
    }

    assert!(gradebook(dir.path(), &["delete", "1"]).status.success());
    assert!(!gradebook(dir.path(), &["delete", "1"]).status.success());
    assert!(!gradebook(dir.path(), &["show", "1"]).status.success());

    let cleared = stdout(&gradebook(dir.path(), &["clear"]));
    assert_eq!(cleared.trim(), "Removed 1 eval run(s)");
    assert_eq!(stdout(&gradebook(dir.path(), &["list"])).trim(), "No eval runs found.");
}

#[test]
fn unknown_report_format_is_rejected() {
    let dir = workspace();
    let output = gradebook(dir.path(), &["stats", "--format", "sarif"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("available: console, json"));
}

#[test]
fn invalid_config_reports_config_code() {
    let dir = workspace();
    let output = gradebook(dir.path(), &["--oracle-timeout", "0", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: [CONFIG_ERROR]"), "stderr: {stderr}");
}

#[test]
fn unopenable_ledger_reports_storage_code() {
    let dir = workspace();
    let output = gradebook(dir.path(), &["--db", "good.py/ledger.db", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: [STORAGE_ERROR]"), "stderr: {stderr}");
}
