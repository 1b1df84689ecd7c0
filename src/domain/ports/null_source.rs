//! Null source reader implementation.
//!
//! Used when the engine runs without access to the source tree, e.g. on a
//! machine that only sees the CI report.

use super::SourceReader;
use crate::domain::errors::{StrategyError, StrategyResult};

/// A reader for which every file is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSourceReader;

impl NullSourceReader {
    pub const fn new() -> Self {
        Self
    }
}

impl SourceReader for NullSourceReader {
    fn read_lines(&self, path: &str) -> StrategyResult<Vec<String>> {
        Err(StrategyError::SourceUnavailable {
            path: path.to_string(),
            reason: "no source tree attached".to_string(),
        })
    }
}
