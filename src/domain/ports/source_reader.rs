use crate::domain::errors::{StrategyError, StrategyResult};

/// Read-only view of the source tree the diagnostics refer to.
///
/// Implementations must never write. Paths are passed exactly as they appear
/// in diagnostics; resolving them against a root is the reader's job.
pub trait SourceReader: Send + Sync {
    /// Read `path` split into lines, without line terminators.
    fn read_lines(&self, path: &str) -> StrategyResult<Vec<String>>;

    /// Read a single 1-based line of `path`.
    fn read_line(&self, path: &str, line: u32) -> StrategyResult<String> {
        let lines = self.read_lines(path)?;
        let index = usize::try_from(line).unwrap_or(usize::MAX);
        if index == 0 || index > lines.len() {
            return Err(StrategyError::LineOutOfRange {
                path: path.to_string(),
                line,
                len: lines.len(),
            });
        }
        Ok(lines[index - 1].clone())
    }
}
