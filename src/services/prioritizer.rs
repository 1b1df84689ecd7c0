use crate::domain::models::{ErrorRecord, FailureAnalysis};
use crate::services::taxonomy::{priority_of, Taxonomy};

/// Flatten all jobs' errors and stable-sort them by descending priority.
///
/// Kinds are alias-resolved first. Errors of equal priority keep their
/// input order (job by job, error by error).
pub fn prioritize(analysis: &FailureAnalysis, taxonomy: &Taxonomy) -> Vec<ErrorRecord> {
    let mut records: Vec<ErrorRecord> = analysis
        .errors()
        .map(|record| taxonomy.resolve_record(record))
        .collect();
    // `sort_by_key` is stable.
    records.sort_by_key(|record| std::cmp::Reverse(priority_of(&record.kind)));
    records
}
