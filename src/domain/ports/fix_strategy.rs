use std::fmt;

use serde::Serialize;

use super::source_reader::SourceReader;
use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorRecord, FailureAnalysis, FixCandidate};

/// Identifier of a strategy family in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyId {
    LintStyle,
    UnusedImport,
    Formatter,
    Runtime,
    Dependency,
    PeerDependency,
    FailureReview,
    SecurityAudit,
    ManualReview,
}

impl StrategyId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LintStyle => "lint-style",
            Self::UnusedImport => "unused-import",
            Self::Formatter => "formatter",
            Self::Runtime => "runtime",
            Self::Dependency => "dependency",
            Self::PeerDependency => "peer-dependency",
            Self::FailureReview => "failure-review",
            Self::SecurityAudit => "security-audit",
            Self::ManualReview => "manual-review",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables strategies read while building candidates.
#[derive(Debug, Clone)]
pub struct StrategySettings {
    /// Candidates below this confidence are flagged for human review.
    pub review_threshold: f64,
    /// Python requirements file dependency fixes append to.
    pub requirements_file: String,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            review_threshold: 0.7,
            requirements_file: "requirements.txt".to_string(),
        }
    }
}

/// Everything a strategy may look at besides the error itself.
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
    pub analysis: &'a FailureAnalysis,
    pub sources: &'a dyn SourceReader,
    pub settings: &'a StrategySettings,
}

impl<'a> StrategyContext<'a> {
    pub const fn new(
        analysis: &'a FailureAnalysis,
        sources: &'a dyn SourceReader,
        settings: &'a StrategySettings,
    ) -> Self {
        Self {
            analysis,
            sources,
            settings,
        }
    }

    /// Start a candidate for `record`, flagged for review when the
    /// confidence falls below the configured threshold.
    pub fn candidate(
        &self,
        record: &ErrorRecord,
        description: impl Into<String>,
        confidence: f64,
    ) -> FixCandidate {
        let candidate = FixCandidate::for_record(record, description, confidence);
        if candidate.confidence < self.settings.review_threshold {
            candidate.needing_review()
        } else {
            candidate
        }
    }
}

impl fmt::Debug for StrategyContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyContext")
            .field("jobs", &self.analysis.jobs.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// A stateless fix-generation strategy.
///
/// `Ok(None)` means "no fix for this error" and is an expected outcome.
/// `Err` is reserved for unexpected conditions such as an unreadable file;
/// the dispatcher logs it and carries on with the next error.
pub trait FixStrategy: Send + Sync {
    /// Registry identifier of this strategy.
    fn id(&self) -> StrategyId;

    /// Propose a fix for `record`.
    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>>;
}
