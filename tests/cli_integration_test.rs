//! CLI integration tests for the mender binary.
//! Runs each command in an isolated temporary project directory.

mod common;

use assert_cmd::Command;
use common::{error, single_job, temp_dir, write_analysis, write_file, UTILS_PY};
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

// ============================================================
// Helper functions
// ============================================================

/// Build an `assert_cmd::Command` pointing at the `mender` binary,
/// with its working directory set to `dir`.
fn mender_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo_bin_cmd!("mender");
    cmd.current_dir(dir)
        .env_remove("MENDER_CONFIG")
        .env("MENDER_LOGGING__LEVEL", "error");
    cmd
}

/// Parse stdout of a finished command as JSON.
fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|e| panic!("Failed to parse JSON from stdout: {e}"))
}

fn read_report(path: &Path) -> Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read report {}: {e}", path.display()));
    serde_json::from_str(&content).expect("report is JSON")
}

// ============================================================
// Analyze command tests
// ============================================================

#[test]
fn analyze_writes_report_and_exits_zero() {
    let tmp = temp_dir();
    let dir = tmp.path();
    let input = write_analysis(
        dir,
        &single_job("lint", vec![error("lint-style", "app.py:10:1: E302 expected 2 blank lines")]),
    );

    mender_cmd(dir)
        .args(["analyze"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 1 error(s) have fix proposals"))
        .stdout(predicate::str::contains("app.py"));

    let report = read_report(&dir.join(".mender/fix-report.json"));
    assert_eq!(report["ok"], true);
    assert_eq!(report["totalErrors"], 1);
    assert_eq!(report["consolidated"][0]["targetFile"], "app.py");
    assert_eq!(report["consolidated"][0]["representative"]["confidence"], 0.95);
}

#[test]
fn analyze_json_output_is_the_report() {
    let tmp = temp_dir();
    let dir = tmp.path();
    write_file(dir, "utils.py", UTILS_PY);
    let input = write_analysis(
        dir,
        &single_job(
            "lint",
            vec![
                error("lint-style", "utils.py:1:80: E501 line too long (86 > 79 characters)"),
                error("lint-unused-import", "utils.py:2:1: F401 'os' imported but unused"),
            ],
        ),
    );

    let output = mender_cmd(dir)
        .args(["--json", "analyze", "--output", "out/report.json"])
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .clone();

    let report = stdout_json(&output);
    assert_eq!(report["ok"], true);
    assert_eq!(report["fixableErrors"], 2);
    assert_eq!(report["consolidated"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["consolidated"][0]["confidence"], 0.92);
    assert_eq!(report["consolidated"][0]["candidates"].as_array().map(Vec::len), Some(2));

    assert_eq!(read_report(&dir.join("out/report.json")), report);
}

#[test]
fn analyze_reads_from_stdin() {
    let tmp = temp_dir();
    let input = single_job(
        "tests",
        vec![error("test-failure", "FAILED tests/test_x.py - assert 1 == 2")],
    );

    let output = mender_cmd(tmp.path())
        .args(["analyze", "-", "--json", "--no-source"])
        .write_stdin(input.to_string())
        .assert()
        .success()
        .get_output()
        .clone();

    let report = stdout_json(&output);
    let rep = &report["consolidated"][0]["representative"];
    assert_eq!(rep["requiresHumanReview"], true);
    assert!(rep["patch"].is_null());
    assert!(rep["confidence"].as_f64().is_some_and(|c| c <= 0.4));
}

#[test]
fn analyze_malformed_input_exits_one() {
    let tmp = temp_dir();
    let dir = tmp.path();
    let input = write_file(dir, "broken.json", "{ this is not json");

    let output = mender_cmd(dir)
        .args(["analyze", "--json"])
        .arg(&input)
        .assert()
        .code(1)
        .get_output()
        .clone();

    let report = stdout_json(&output);
    assert_eq!(report["ok"], false);
    assert!(report["runError"].as_str().is_some_and(|msg| !msg.is_empty()));

    let written = read_report(&dir.join(".mender/fix-report.json"));
    assert_eq!(written["ok"], false);
}

#[test]
fn analyze_missing_input_exits_one() {
    let tmp = temp_dir();

    mender_cmd(tmp.path())
        .args(["analyze", "does-not-exist.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Triage failed"));
}

#[test]
fn analyze_empty_analysis_succeeds() {
    let tmp = temp_dir();
    let dir = tmp.path();
    let input = write_file(dir, "empty.json", r#"{"failedJobs": []}"#);

    let output = mender_cmd(dir)
        .args(["analyze", "--json"])
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .clone();

    let report = stdout_json(&output);
    assert_eq!(report["ok"], true);
    assert_eq!(report["totalErrors"], 0);
    assert_eq!(report["overallConfidence"], 0.0);
}

#[test]
fn analyze_rejects_invalid_env_config() {
    let tmp = temp_dir();
    let dir = tmp.path();
    let input = write_file(dir, "empty.json", r#"{"failedJobs": []}"#);

    mender_cmd(dir)
        .env("MENDER_ENGINE__REVIEW_THRESHOLD", "1.5")
        .args(["analyze"])
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn analyze_with_missing_config_file_fails() {
    let tmp = temp_dir();
    let dir = tmp.path();
    let input = write_file(dir, "empty.json", r#"{"failedJobs": []}"#);

    mender_cmd(dir)
        .args(["--config", "nowhere.yaml", "analyze"])
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn analyze_reads_project_config() {
    let tmp = temp_dir();
    let dir = tmp.path();
    write_file(
        dir,
        ".mender/config.yaml",
        "output:\n  report_path: reports/triage.json\n  pretty: false\n",
    );
    let input = write_file(dir, "empty.json", r#"{"failedJobs": []}"#);

    mender_cmd(dir).args(["analyze"]).arg(&input).assert().success();

    let content = std::fs::read_to_string(dir.join("reports/triage.json")).expect("report written");
    assert_eq!(content.lines().count(), 1);
}

// ============================================================
// Taxonomy command tests
// ============================================================

#[test]
fn taxonomy_lists_kinds() {
    let tmp = temp_dir();

    mender_cmd(tmp.path())
        .args(["taxonomy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compilation-error"))
        .stdout(predicate::str::contains("manual-review"));
}

#[test]
fn taxonomy_json_includes_configured_aliases() {
    let tmp = temp_dir();
    let dir = tmp.path();
    write_file(dir, ".mender/config.yaml", "taxonomy:\n  aliases:\n    flake8: lint-style\n");

    let output = mender_cmd(dir)
        .args(["taxonomy", "--json"])
        .assert()
        .success()
        .get_output()
        .clone();

    let value = stdout_json(&output);
    assert_eq!(value["aliases"]["flake8"], "lint-style");
    assert!(value["kinds"].as_array().is_some_and(|kinds| !kinds.is_empty()));
}

// ============================================================
// Init command tests
// ============================================================

#[test]
fn init_creates_config() {
    let tmp = temp_dir();
    let dir = tmp.path();

    mender_cmd(dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("initialized successfully"));

    assert!(dir.join(".mender/config.yaml").is_file());

    // The written defaults are a valid config for later commands.
    mender_cmd(dir).args(["taxonomy"]).assert().success();
}

#[test]
fn init_twice_keeps_existing_config() {
    let tmp = temp_dir();
    let dir = tmp.path();

    mender_cmd(dir).args(["init"]).assert().success();
    mender_cmd(dir)
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already initialized"));
}
