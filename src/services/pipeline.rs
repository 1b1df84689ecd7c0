//! End-to-end triage: parse, prioritize, dispatch, consolidate, report.
//!
//! Any failure to obtain a [`FailureAnalysis`] becomes a
//! [`FixReport::failed`] report; nothing past parsing can fail the run.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Config, FailureAnalysis, FixCandidate, FixReport};
use crate::domain::ports::{SourceReader, StrategySettings};
use crate::services::consolidator::consolidate;
use crate::services::dispatcher::Dispatcher;
use crate::services::prioritizer::prioritize;
use crate::services::report::assemble;
use crate::services::strategies::StrategyRegistry;
use crate::services::taxonomy::Taxonomy;

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Read and parse a failure analysis from `path`, or stdin for `-`.
pub fn read_analysis(path: &Path) -> DomainResult<FailureAnalysis> {
    if path.as_os_str() == STDIN_PATH {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|source| DomainError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        return FailureAnalysis::from_json(&input);
    }
    let file = std::fs::File::open(path).map_err(|source| DomainError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    FailureAnalysis::from_reader(std::io::BufReader::new(file))
}

/// The triage engine.
#[derive(Debug, Clone)]
pub struct TriagePipeline {
    taxonomy: Taxonomy,
    dispatcher: Dispatcher,
    max_concurrency: usize,
}

impl TriagePipeline {
    pub fn new(
        taxonomy: Taxonomy,
        registry: Arc<StrategyRegistry>,
        sources: Arc<dyn SourceReader>,
        settings: StrategySettings,
        max_concurrency: usize,
    ) -> Self {
        Self {
            taxonomy,
            dispatcher: Dispatcher::new(registry, sources, settings),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Pipeline with the built-in strategies, configured from `config`.
    pub fn from_config(config: &Config, sources: Arc<dyn SourceReader>) -> Self {
        let settings = StrategySettings {
            review_threshold: config.engine.review_threshold,
            requirements_file: config.engine.requirements_file.clone(),
        };
        Self::new(
            Taxonomy::from_config(&config.taxonomy),
            Arc::new(StrategyRegistry::with_defaults()),
            sources,
            settings,
            config.engine.max_concurrency,
        )
    }

    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    fn finish(&self, total_errors: usize, candidates: Vec<FixCandidate>) -> FixReport {
        let consolidated = consolidate(candidates.clone());
        let report = assemble(total_errors, &candidates, consolidated);
        info!(
            total_errors = report.total_errors,
            fixable_errors = report.fixable_errors,
            groups = report.consolidated.len(),
            overall_confidence = report.overall_confidence,
            "triage complete"
        );
        report
    }

    /// Single synchronous pass.
    #[instrument(skip_all, fields(jobs = analysis.jobs.len()))]
    pub fn run(&self, analysis: &FailureAnalysis) -> FixReport {
        let ordered = prioritize(analysis, &self.taxonomy);
        let candidates = self.dispatcher.dispatch(analysis, &ordered);
        self.finish(ordered.len(), candidates)
    }

    /// Bounded-parallel dispatch; falls back to [`run`](Self::run) when
    /// `max_concurrency` is 1.
    #[instrument(skip_all, fields(jobs = analysis.jobs.len(), max_concurrency = self.max_concurrency))]
    pub async fn run_concurrent(&self, analysis: Arc<FailureAnalysis>) -> FixReport {
        if self.max_concurrency <= 1 {
            return self.run(&analysis);
        }
        let ordered = prioritize(&analysis, &self.taxonomy);
        let total = ordered.len();
        match self
            .dispatcher
            .dispatch_concurrent(Arc::clone(&analysis), ordered, self.max_concurrency)
            .await
        {
            Ok(candidates) => self.finish(total, candidates),
            Err(err) => {
                error!(error = %err, "dispatch aborted");
                FixReport::failed(err.to_string())
            }
        }
    }

    /// Parse `input` and run synchronously.
    pub fn run_json(&self, input: &str) -> FixReport {
        match FailureAnalysis::from_json(input) {
            Ok(analysis) => self.run(&analysis),
            Err(err) => {
                error!(error = %err, "failure analysis rejected");
                FixReport::failed(err.to_string())
            }
        }
    }

    /// Read the analysis from `path` (or stdin for `-`) and run.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn run_path(&self, path: &Path) -> FixReport {
        match read_analysis(path) {
            Ok(analysis) => self.run_concurrent(Arc::new(analysis)).await,
            Err(err) => {
                error!(error = %err, "failure analysis rejected");
                FixReport::failed(err.to_string())
            }
        }
    }
}
