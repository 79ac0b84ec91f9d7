//! Ledger lifecycle: lazy open, append/get round-trip, ordering, deletion.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use gradebook_core::EvalRun;
use gradebook_storage::Ledger;

fn at(day: u32, hour: u32, micro: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, day)
        .unwrap()
        .and_hms_micro_opt(hour, 15, 30, micro)
        .unwrap()
}

fn sample_run(revision: &str, timestamp: NaiveDateTime) -> EvalRun {
    let mut results = BTreeMap::new();
    results.insert("used_service_skill".to_string(), true);
    results.insert("used_none_instead_of_optional".to_string(), true);
    results.insert("used_dataclasses_for_methods".to_string(), false);
    results.insert("no_constructor_side_effects".to_string(), true);
    EvalRun {
        wall_clock_time: 42.125,
        input_tokens: 18_250,
        output_tokens: 1_733,
        eval_results: results,
        revision: revision.to_string(),
        diff: "diff --git a/logger.py b/logger.py\n+class Logger:\n".to_string(),
        working_directory: "/home/dev/gym".to_string(),
        timestamp,
        model: "claude-sonnet-4-5-20250929".to_string(),
    }
}

#[test]
fn open_has_no_side_effect_until_first_use() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("evals.db");

    let ledger = Ledger::open(&path);
    assert!(!ledger.is_connected());
    assert!(!path.exists());

    assert_eq!(ledger.count().unwrap(), 0);
    assert!(ledger.is_connected());
    assert!(path.exists());
}

#[test]
fn close_without_use_is_noop() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("never.db");
    let ledger = Ledger::open(&path);
    ledger.close().unwrap();
    assert!(!path.exists());
}

#[test]
fn append_then_get_roundtrips_every_field() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    let run = sample_run("abc123", at(20, 10, 654_321));
    let id = ledger.append(&run).unwrap();
    assert!(id > 0);

    let stored = ledger.get(id).unwrap().expect("row should exist");
    assert_eq!(stored.id, id);
    assert_eq!(stored.run, run);
    ledger.close().unwrap();
}

#[test]
fn get_missing_id_is_none() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));
    assert!(ledger.get(999).unwrap().is_none());
}

#[test]
fn list_all_is_most_recently_inserted_first() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    // Insertion order deliberately differs from timestamp order.
    let first = ledger.append(&sample_run("r1", at(21, 9, 0))).unwrap();
    let second = ledger.append(&sample_run("r2", at(19, 9, 0))).unwrap();
    let third = ledger.append(&sample_run("r1", at(20, 9, 0))).unwrap();

    let ids: Vec<i64> = ledger.list_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[test]
fn list_by_revision_filters_and_orders_by_timestamp() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    let late = ledger.append(&sample_run("abc123", at(22, 8, 0))).unwrap();
    ledger.append(&sample_run("def456", at(23, 8, 0))).unwrap();
    let early = ledger.append(&sample_run("abc123", at(18, 8, 0))).unwrap();
    let middle = ledger.append(&sample_run("abc123", at(20, 8, 0))).unwrap();

    let runs = ledger.list_by_revision("abc123").unwrap();
    let ids: Vec<i64> = runs.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![late, middle, early]);
    assert!(runs.iter().all(|r| r.run.revision == "abc123"));

    assert!(ledger.list_by_revision("abc").unwrap().is_empty());
}

#[test]
fn list_revisions_most_recent_first() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    ledger.append(&sample_run("old", at(10, 8, 0))).unwrap();
    ledger.append(&sample_run("new", at(12, 8, 0))).unwrap();
    ledger.append(&sample_run("old", at(11, 8, 0))).unwrap();

    assert_eq!(ledger.list_revisions().unwrap(), vec!["new", "old"]);
}

#[test]
fn delete_existing_and_missing() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    let id = ledger.append(&sample_run("abc123", at(20, 8, 0))).unwrap();
    assert!(ledger.delete(id).unwrap());
    assert!(ledger.get(id).unwrap().is_none());
    assert!(!ledger.delete(id).unwrap());
    assert!(!ledger.delete(12_345).unwrap());
}

#[test]
fn clear_returns_removed_count() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    for day in 1..=3 {
        ledger.append(&sample_run("abc123", at(day, 8, 0))).unwrap();
    }
    assert_eq!(ledger.clear().unwrap(), 3);
    assert_eq!(ledger.count().unwrap(), 0);
    assert_eq!(ledger.clear().unwrap(), 0);
}

#[test]
fn runs_survive_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("evals.db");

    let run = sample_run("abc123", at(20, 8, 1));
    let id = {
        let ledger = Ledger::open(&path);
        let id = ledger.append(&run).unwrap();
        ledger.close().unwrap();
        id
    };

    let reopened = Ledger::open(&path);
    assert_eq!(reopened.get(id).unwrap().unwrap().run, run);
}

#[test]
fn empty_diff_runs_are_stored() {
    let dir = tempfile::TempDir::new().unwrap();
    let ledger = Ledger::open(dir.path().join("evals.db"));

    let mut run = sample_run("abc123", at(20, 8, 0));
    run.diff = String::new();
    let id = ledger.append(&run).unwrap();

    let stored = ledger.get(id).unwrap().unwrap();
    assert_eq!(stored.run.diff, "");
    assert!(!stored.run.has_diff());
}
