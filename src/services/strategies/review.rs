//! Strategies that surface errors for a human instead of patching them.

use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorKind, ErrorRecord, FixCandidate};
use crate::domain::ports::{FixStrategy, StrategyContext, StrategyId};
use crate::services::diagnostics::{parse_failure_location, SourceLocation};
use crate::services::taxonomy::confidence;

fn location_of(record: &ErrorRecord) -> Option<SourceLocation> {
    parse_failure_location(&record.message).or_else(|| {
        record.file.as_ref().map(|file| SourceLocation {
            file: file.clone(),
            line: record.line,
            test: None,
        })
    })
}

fn describe_location(location: &SourceLocation) -> String {
    match (&location.test, location.line) {
        (Some(test), _) => format!("{}::{test}", location.file),
        (None, Some(line)) => format!("{}:{line}", location.file),
        (None, None) => location.file.clone(),
    }
}

/// Test, assertion and compilation failures.
///
/// Always produces a low-confidence candidate flagged for review, pointing
/// at the failing file when one can be found.
#[derive(Debug, Default)]
pub struct FailureReviewStrategy;

impl FixStrategy for FailureReviewStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::FailureReview
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let (what, confidence) = match record.kind {
            ErrorKind::TestFailure => ("Test failure", confidence::TEST_FAILURE),
            ErrorKind::AssertionFailure => ("Assertion failure", confidence::ASSERTION_FAILURE),
            _ => ("Compilation error", confidence::COMPILATION_ERROR),
        };
        let location = location_of(record);
        let description = match &location {
            Some(loc) => format!("{what} in {} needs investigation", describe_location(loc)),
            None => format!("{what} in job '{}' needs investigation", record.job_name),
        };

        Ok(Some(
            ctx.candidate(record, description, confidence)
                .with_target_opt(location.map(|loc| loc.file))
                .needing_review(),
        ))
    }
}

/// Fallback for unclassified and unknown kinds.
#[derive(Debug, Default)]
pub struct ManualReviewStrategy;

impl FixStrategy for ManualReviewStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::ManualReview
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let description = match &record.kind {
            ErrorKind::Unknown(tag) => format!(
                "Unrecognised error kind '{tag}' in job '{}' needs manual review",
                record.job_name
            ),
            _ => format!("Unclassified error in job '{}' needs manual review", record.job_name),
        };
        Ok(Some(
            ctx.candidate(record, description, confidence::MANUAL_REVIEW)
                .with_target_opt(record.file.clone())
                .needing_review(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::strategies::test_support::Fixture;

    #[test]
    fn test_pytest_failure_targets_test_file() {
        let fixture = Fixture::new();
        let rec = ErrorRecord::new(
            ErrorKind::TestFailure,
            "FAILED tests/test_math.py::test_add - assert 3 == 4",
            "test",
        );
        let candidate = FailureReviewStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");

        assert!(candidate.confidence <= 0.4);
        assert!(candidate.requires_human_review);
        assert_eq!(candidate.target_file.as_deref(), Some("tests/test_math.py"));
        assert!(candidate.description.contains("tests/test_math.py::test_add"));
        assert!(!candidate.is_actionable());
    }

    #[test]
    fn test_compilation_error_confidence_floor() {
        let fixture = Fixture::new();
        let rec = ErrorRecord::new(
            ErrorKind::CompilationError,
            "error[E0308]: mismatched types\n --> src/main.rs:4:9",
            "build",
        );
        let candidate = FailureReviewStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert!((0.2..=0.4).contains(&candidate.confidence));
        assert_eq!(candidate.target_file.as_deref(), Some("src/main.rs"));
    }

    #[test]
    fn test_failure_without_location_uses_job() {
        let fixture = Fixture::new();
        let rec = ErrorRecord::new(ErrorKind::AssertionFailure, "AssertionError", "unit");
        let candidate = FailureReviewStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert_eq!(candidate.target_file, None);
        assert!(candidate.description.contains("'unit'"));
    }

    #[test]
    fn test_manual_review_for_unknown_kind() {
        let fixture = Fixture::new();
        let rec = ErrorRecord::new(ErrorKind::from_tag("quantum-flux"), "boom", "deploy");
        let candidate = ManualReviewStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert!((candidate.confidence - 0.10).abs() < f64::EPSILON);
        assert!(candidate.requires_human_review);
        assert!(candidate.description.contains("quantum-flux"));
    }
}
