//! Property tests for ordering, grouping and report bounds.

use std::collections::HashMap;
use std::sync::Arc;

use mender::services::{consolidate, prioritize, priority_of};
use mender::{Config, ErrorKind, ErrorRecord, FailureAnalysis, Job, NullSourceReader, Taxonomy, TriagePipeline};
use proptest::prelude::*;

const SAMPLES: &[(&str, &str)] = &[
    ("lint-style", "app.py:10:1: E302 expected 2 blank lines"),
    ("lint-style", "app.py:12:1: E305 expected 2 blank lines after class or function definition, found 1"),
    ("lint-unused-import", "app.py:1:1: F401 'os' imported but unused"),
    ("format-violation", "would reformat src/app.py"),
    ("format-violation", "Code style issues found in web/index.ts"),
    ("runtime-import-error", "ImportError: cannot import name 'url_quote' from 'werkzeug.urls'"),
    ("runtime-import-error", "ModuleNotFoundError: No module named 'yaml'"),
    ("runtime-attribute-error", "AttributeError: module 'numpy' has no attribute 'float'."),
    ("runtime-value-error", "ValueError: something else entirely"),
    ("dependency-missing", "Error: Cannot find module 'lodash'"),
    ("peer-dependency-missing", "npm WARN react-dom@18.2.0 requires a peer of react@^18.2.0 but none is installed."),
    ("test-failure", "FAILED tests/test_x.py::test_it - assert 1 == 2"),
    ("assertion-failure", "AssertionError: expected 3"),
    ("compilation-error", "src/app.ts(4,2): error TS2322: Type 'string' is not assignable"),
    ("security-vulnerability", "found 2 high severity vulnerabilities"),
    ("unclassified", "something odd happened"),
    ("Mystery_Tool", "exploded"),
];

fn build_analysis(jobs: &[Vec<usize>]) -> FailureAnalysis {
    FailureAnalysis::new(
        jobs.iter()
            .enumerate()
            .map(|(i, picks)| {
                Job::new(
                    format!("job-{i}"),
                    picks
                        .iter()
                        .map(|&pick| {
                            let (kind, message) = SAMPLES[pick];
                            (ErrorKind::from_tag(kind), message.to_string())
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

fn analysis_strategy() -> impl Strategy<Value = FailureAnalysis> {
    prop::collection::vec(prop::collection::vec(0..SAMPLES.len(), 0..6), 0..5)
        .prop_map(|jobs| build_analysis(&jobs))
}

fn pipeline(max_concurrency: usize) -> TriagePipeline {
    let mut config = Config::default();
    config.engine.max_concurrency = max_concurrency;
    TriagePipeline::from_config(&config, Arc::new(NullSourceReader::new()))
}

proptest! {
    /// Property: prioritization is a stable sort by descending priority
    #[test]
    fn prop_prioritize_is_stable(analysis in analysis_strategy()) {
        let ordered = prioritize(&analysis, &Taxonomy::new());
        prop_assert_eq!(ordered.len(), analysis.error_count());

        for pair in ordered.windows(2) {
            prop_assert!(priority_of(&pair[0].kind) >= priority_of(&pair[1].kind));
        }

        // Within one priority, input order is preserved.
        let input: Vec<&ErrorRecord> = analysis.errors().collect();
        let mut by_priority: HashMap<u8, Vec<&ErrorRecord>> = HashMap::new();
        for record in &input {
            by_priority.entry(priority_of(&record.kind)).or_default().push(record);
        }
        let mut seen: HashMap<u8, usize> = HashMap::new();
        for record in &ordered {
            let priority = priority_of(&record.kind);
            let index = seen.entry(priority).or_default();
            prop_assert_eq!(&by_priority[&priority][*index], &record);
            *index += 1;
        }
    }

    /// Property: report counts and confidences stay in range
    #[test]
    fn prop_report_is_bounded(analysis in analysis_strategy()) {
        let report = pipeline(1).run(&analysis);

        prop_assert!(report.ok);
        prop_assert_eq!(report.total_errors, analysis.error_count());
        prop_assert!(report.fixable_errors <= report.total_errors);
        prop_assert_eq!(report.candidates().count(), report.fixable_errors);
        prop_assert!((0.0..=1.0).contains(&report.overall_confidence));

        for candidate in report.candidates() {
            prop_assert!((0.0..=1.0).contains(&candidate.confidence));
            if candidate.confidence < Config::default().engine.review_threshold {
                prop_assert!(candidate.requires_human_review);
            }
        }
    }

    /// Property: the representative is the highest-confidence member
    #[test]
    fn prop_representative_is_max(analysis in analysis_strategy()) {
        let report = pipeline(1).run(&analysis);

        for group in &report.consolidated {
            let max = group
                .candidates
                .iter()
                .map(|c| c.confidence)
                .fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(group.candidates.contains(&group.representative));
            prop_assert_eq!(group.representative.confidence, max);
            prop_assert_eq!(group.confidence, max);
            if group.target_file.is_none() {
                prop_assert_eq!(group.candidates.len(), 1);
            }
        }
    }

    /// Property: consolidating an already consolidated list changes nothing
    #[test]
    fn prop_consolidation_is_idempotent(analysis in analysis_strategy()) {
        let report = pipeline(1).run(&analysis);
        let flattened: Vec<_> = report.candidates().cloned().collect();
        prop_assert_eq!(consolidate(flattened), report.consolidated);
    }

    /// Property: bounded-parallel dispatch produces the sequential report
    #[test]
    fn prop_concurrent_matches_sequential(analysis in analysis_strategy(), workers in 2usize..9) {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let expected = pipeline(1).run(&analysis);
        let actual = runtime.block_on(pipeline(workers).run_concurrent(Arc::new(analysis)));
        prop_assert_eq!(actual, expected);
    }
}
