//! Domain errors for the Mender triage engine.

use std::path::PathBuf;

use thiserror::Error;

/// Pipeline-level errors. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Malformed failure analysis: {0}")]
    MalformedInput(String),

    #[error("Failed to read failure analysis from {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dispatch failed: {0}")]
    DispatchFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure of a single strategy invocation.
///
/// Never escapes the dispatcher: it is logged and the error simply yields
/// no candidate.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Source file {path} unavailable: {reason}")]
    SourceUnavailable { path: String, reason: String },

    #[error("Line {line} out of range for {path} ({len} lines)")]
    LineOutOfRange { path: String, line: u32, len: usize },

    #[error("Diagnostic has no usable location: {0}")]
    MissingLocation(String),

    #[error("Strategy panicked: {0}")]
    Panicked(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}
