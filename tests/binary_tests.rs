//! Integration tests for the querygate binary.

use std::fs;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary running inside `dir` with no user config or overrides
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("querygate");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("QUERYGATE_BASELINE")
        .env_remove("QUERYGATE_TOLERANCE")
        .env_remove("QUERYGATE_THRESHOLD")
        .env_remove("QUERYGATE_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

#[test]
fn test_no_subcommand_prints_help() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_check_regression_blocks() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".querygate.json", r#"{"test_users": 3, "test_orders": 5}"#);
    write(&dir, "results.json", r#"{"test_users": 10, "test_orders": 5}"#);

    cmd(&dir)
        .args(["check", "results.json", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1 regression(s) detected. Gate BLOCKED."))
        .stdout(predicate::str::contains("test_users: 10 queries (expected <=3, +7)"))
        .stdout(predicate::str::contains("\u{2713} test_orders: 5 queries"));
}

#[test]
fn test_check_pass() {
    let dir = TempDir::new().unwrap();
    write(&dir, "bl.json", r#"{"test_a": 3}"#);
    write(&dir, "results.json", r#"{"test_a": 3}"#);

    cmd(&dir)
        .args(["check", "results.json", "-b", "bl.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All 1 test(s) passed query gate."));
}

#[test]
fn test_check_tolerance_flag() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".querygate.json", r#"{"test_x": 5}"#);
    write(&dir, "results.json", r#"{"test_x": 7}"#);

    cmd(&dir)
        .args(["check", "results.json", "-t", "3", "--no-color"])
        .assert()
        .success();
    cmd(&dir)
        .args(["check", "results.json", "--tolerance", "1", "--no-color"])
        .assert()
        .code(1);
}

#[test]
fn test_check_negative_tolerance_is_usage_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "results.json", r#"{"test_x": 7}"#);

    cmd(&dir)
        .args(["check", "results.json", "--tolerance=-1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_check_tolerance_from_env() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".querygate.json", r#"{"test_x": 5}"#);
    write(&dir, "results.json", r#"{"test_x": 7}"#);

    cmd(&dir)
        .env("QUERYGATE_TOLERANCE", "2")
        .args(["check", "results.json", "--no-color"])
        .assert()
        .success();
}

#[test]
fn test_check_settings_from_config_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".querygate.toml", "[check]\nbaseline = \"ci.json\"\ntolerance = 5\n");
    write(&dir, "ci.json", r#"{"test_x": 5}"#);
    write(&dir, "results.json", r#"{"test_x": 9}"#);

    cmd(&dir)
        .args(["check", "results.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{2713} test_x: 9 queries"));
}

#[test]
fn test_check_missing_baseline_reports_new() {
    let dir = TempDir::new().unwrap();
    write(&dir, "results.json", r#"{"test_a": 4}"#);

    cmd(&dir)
        .args(["check", "results.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{25cf} test_a: 4 queries"));
}

#[test]
fn test_check_missing_results_file() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["check", "/nonexistent/results.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_malformed_results_names_path() {
    let dir = TempDir::new().unwrap();
    write(&dir, "results.json", "{\"test_a\": ");

    cmd(&dir)
        .args(["check", "results.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_json_format() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".querygate.json", r#"{"test_a": 3}"#);
    write(&dir, "results.json", r#"{"test_a": 4}"#);

    let output = cmd(&dir)
        .args(["check", "results.json", "-f", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcomes"][0]["status"], "fail");
    assert_eq!(json["outcomes"][0]["delta"], 1);
}

#[test]
fn test_baseline_writes_sorted_snapshot() {
    let dir = TempDir::new().unwrap();
    write(&dir, ".querygate.json", r#"{"test_old": 1}"#);
    write(&dir, "results.json", r#"{"test_b": 2, "test_a": 1}"#);

    cmd(&dir)
        .args(["baseline", "results.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Baseline saved: 2 test(s) -> .querygate.json"
        ));

    let content = fs::read_to_string(dir.path().join(".querygate.json")).unwrap();
    assert_eq!(content, "{\n  \"test_a\": 1,\n  \"test_b\": 2\n}\n");
}

#[test]
fn test_baseline_then_check() {
    let dir = TempDir::new().unwrap();
    write(&dir, "results.json", r#"{"test_a": 3, "test_b": 8}"#);

    cmd(&dir)
        .args(["baseline", "results.json", "-b", "snap/bl.json"])
        .assert()
        .success();
    cmd(&dir)
        .args(["check", "results.json", "-b", "snap/bl.json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All 2 test(s) passed query gate."));
}

#[test]
fn test_analyze_finds_nplus1() {
    let dir = TempDir::new().unwrap();
    let mut queries = vec!["SELECT * FROM orders".to_string()];
    queries.extend((0..50).map(|i| format!("SELECT * FROM products WHERE id = {}", i)));
    write(&dir, "queries.json", &serde_json::to_string(&queries).unwrap());

    cmd(&dir)
        .args(["analyze", "queries.json", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("N+1: 50x [critical]"))
        .stdout(predicate::str::contains("1 N+1 pattern(s) found in 51 queries."));
}

#[test]
fn test_analyze_threshold_flag() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "queries.json",
        r#"["SELECT * FROM t WHERE id = 1", "SELECT * FROM t WHERE id = 2", "SELECT * FROM t WHERE id = 3"]"#
    );

    cmd(&dir)
        .args(["analyze", "queries.json", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("N+1: 3x [warning]"));
    cmd(&dir)
        .args(["analyze", "queries.json", "-t", "3", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No N+1 patterns in 3 queries."));
}

#[test]
fn test_analyze_missing_file() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["analyze", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_unreadable_baseline_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(&dir, "plain.txt", "x");
    write(&dir, "results.json", r#"{"test_a": 50}"#);

    cmd(&dir)
        .args(["check", "results.json", "-b", "plain.txt/bl.json", "--no-color"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("passed query gate").not())
        .stderr(predicate::str::contains("Error"));
}
