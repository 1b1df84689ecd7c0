//! Common test utilities for integration tests
//!
//! Builders for failure-analysis JSON and on-disk fixtures shared by the
//! scenario, property and CLI tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// One wire-format error entry.
pub fn error(kind: &str, message: &str) -> Value {
    json!({ "type": kind, "message": message })
}

/// A failure analysis with a single job holding `errors`.
pub fn single_job(job_name: &str, errors: Vec<Value>) -> Value {
    json!({
        "failedJobs": [
            { "jobName": job_name, "analysis": { "errors": errors } }
        ]
    })
}

/// A failure analysis from `(job name, errors)` pairs.
pub fn analysis(jobs: Vec<(&str, Vec<Value>)>) -> Value {
    let failed_jobs: Vec<Value> = jobs
        .into_iter()
        .map(|(name, errors)| json!({ "jobName": name, "analysis": { "errors": errors } }))
        .collect();
    json!({ "failedJobs": failed_jobs })
}

/// Write `content` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Write an analysis document to `dir/analysis.json`.
pub fn write_analysis(dir: &Path, analysis: &Value) -> PathBuf {
    write_file(dir, "analysis.json", &analysis.to_string())
}

/// Setup test logging
///
/// Initializes a tracing subscriber that writes through the test harness.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Python module with a long import on line 1 and an unused `os` import on
/// line 2.
pub const UTILS_PY: &str = "from collections import OrderedDict, defaultdict, namedtuple, Counter, ChainMap, deque\nimport os\n\n\ndef helper():\n    return OrderedDict()\n";
