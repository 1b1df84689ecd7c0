//! Confidence aggregation and report assembly.

use crate::domain::models::{ConsolidatedFix, FixCandidate, FixReport};

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean confidence over every candidate, rounded to two decimals; 0 when
/// there are none.
pub fn aggregate_confidence(candidates: &[FixCandidate]) -> f64 {
    if candidates.is_empty() {
        return 0.0;
    }
    let sum: f64 = candidates.iter().map(|c| c.confidence).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / candidates.len() as f64;
    round2(mean).clamp(0.0, 1.0)
}

/// Package a successful run.
///
/// `fixable_errors` is the number of candidates produced; each error
/// yields at most one, so it never exceeds `total_errors`.
pub fn assemble(
    total_errors: usize,
    candidates: &[FixCandidate],
    consolidated: Vec<ConsolidatedFix>,
) -> FixReport {
    FixReport {
        ok: true,
        total_errors,
        fixable_errors: candidates.len().min(total_errors),
        overall_confidence: aggregate_confidence(candidates),
        consolidated,
        run_error: None,
    }
}
