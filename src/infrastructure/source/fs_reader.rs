use std::path::{Component, Path, PathBuf};

use tracing::trace;

use super::split_lines;
use crate::domain::errors::{StrategyError, StrategyResult};
use crate::domain::ports::SourceReader;

/// Reads files relative to a project root.
///
/// Paths that would escape the root (absolute paths outside it, or `..`
/// components) are refused.
#[derive(Debug, Clone)]
pub struct FsSourceReader {
    root: PathBuf,
}

impl FsSourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> StrategyResult<PathBuf> {
        let candidate = Path::new(path);
        let relative = if candidate.is_absolute() {
            candidate
                .strip_prefix(&self.root)
                .map_err(|_| StrategyError::SourceUnavailable {
                    path: path.to_string(),
                    reason: format!("outside source root {}", self.root.display()),
                })?
        } else {
            candidate
        };
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(StrategyError::SourceUnavailable {
                path: path.to_string(),
                reason: "path escapes source root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl SourceReader for FsSourceReader {
    fn read_lines(&self, path: &str) -> StrategyResult<Vec<String>> {
        let full = self.resolve(path)?;
        trace!(path = %full.display(), "reading source file");
        let content =
            std::fs::read_to_string(&full).map_err(|e| StrategyError::SourceUnavailable {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(split_lines(&content))
    }
}
