//! Input model: the failure analysis produced by the log-ingestion side.
//!
//! On the wire the analysis looks like
//! `{"failedJobs": [{"jobName": "...", "analysis": {"errors": [{"type": "...", "message": "..."}]}}]}`.
//! Internally every [`ErrorRecord`] carries its own job name so it can be
//! moved around independently of the job it came from.

use std::io::Read;

use serde::{Deserialize, Serialize};

use super::error_kind::ErrorKind;
use crate::domain::errors::{DomainError, DomainResult};

/// One reported failure. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    pub job_name: String,
    /// File hint supplied by the producer, if any.
    pub file: Option<String>,
    /// 1-based line hint supplied by the producer, if any.
    pub line: Option<u32>,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, message: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            job_name: job_name.into(),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub const fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// A failed CI job and the errors attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub job_name: String,
    pub errors: Vec<ErrorRecord>,
}

impl Job {
    /// Build a job, stamping `job_name` onto each error.
    pub fn new(job_name: impl Into<String>, errors: Vec<(ErrorKind, String)>) -> Self {
        let job_name = job_name.into();
        let errors = errors
            .into_iter()
            .map(|(kind, message)| ErrorRecord::new(kind, message, job_name.clone()))
            .collect();
        Self { job_name, errors }
    }
}

/// Root of the engine input. Read-only for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireAnalysis", into = "WireAnalysis")]
pub struct FailureAnalysis {
    pub jobs: Vec<Job>,
}

impl FailureAnalysis {
    pub const fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    /// Parse the wire JSON form.
    pub fn from_json(input: &str) -> DomainResult<Self> {
        serde_json::from_str(input).map_err(|e| DomainError::MalformedInput(e.to_string()))
    }

    /// Parse the wire JSON form from a reader.
    pub fn from_reader<R: Read>(reader: R) -> DomainResult<Self> {
        serde_json::from_reader(reader).map_err(|e| DomainError::MalformedInput(e.to_string()))
    }

    /// Total number of errors across all jobs.
    pub fn error_count(&self) -> usize {
        self.jobs.iter().map(|job| job.errors.len()).sum()
    }

    /// All errors in per-job, per-error input order.
    pub fn errors(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.jobs.iter().flat_map(|job| job.errors.iter())
    }

    /// Job lookup by name (first match).
    pub fn job(&self, job_name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.job_name == job_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    failed_jobs: Vec<WireJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireJob {
    job_name: String,
    #[serde(default)]
    analysis: WireJobAnalysis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireJobAnalysis {
    #[serde(default)]
    errors: Vec<WireError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireError {
    #[serde(rename = "type", default = "default_error_type")]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

fn default_error_type() -> String {
    "unclassified".to_string()
}

impl From<WireAnalysis> for FailureAnalysis {
    fn from(wire: WireAnalysis) -> Self {
        let jobs = wire
            .failed_jobs
            .into_iter()
            .map(|job| {
                let job_name = job.job_name;
                let errors = job
                    .analysis
                    .errors
                    .into_iter()
                    .map(|err| ErrorRecord {
                        kind: ErrorKind::from_tag(&err.kind),
                        message: err.message,
                        job_name: job_name.clone(),
                        file: err.file,
                        line: err.line,
                    })
                    .collect();
                Job { job_name, errors }
            })
            .collect();
        Self { jobs }
    }
}

impl From<FailureAnalysis> for WireAnalysis {
    fn from(analysis: FailureAnalysis) -> Self {
        let failed_jobs = analysis
            .jobs
            .into_iter()
            .map(|job| WireJob {
                job_name: job.job_name,
                analysis: WireJobAnalysis {
                    errors: job
                        .errors
                        .into_iter()
                        .map(|err| WireError {
                            kind: err.kind.as_tag().to_string(),
                            message: err.message,
                            file: err.file,
                            line: err.line,
                        })
                        .collect(),
                },
            })
            .collect();
        Self { failed_jobs }
    }
}
