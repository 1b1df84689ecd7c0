use std::collections::HashMap;

use super::split_lines;
use crate::domain::errors::{StrategyError, StrategyResult};
use crate::domain::ports::SourceReader;

/// Source tree held in memory, keyed by the path diagnostics use.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceReader {
    files: HashMap<String, String>,
}

impl MemorySourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceReader for MemorySourceReader {
    fn read_lines(&self, path: &str) -> StrategyResult<Vec<String>> {
        self.files
            .get(path)
            .map(|content| split_lines(content))
            .ok_or_else(|| StrategyError::SourceUnavailable {
                path: path.to_string(),
                reason: "not in memory source set".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reader() {
        let reader = MemorySourceReader::new().with_file("a.py", "one\ntwo");
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.read_line("a.py", 2).expect("line"), "two");
        assert!(reader.read_lines("b.py").is_err());
    }
}
