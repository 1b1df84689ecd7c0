//! Fix generation loop.
//!
//! Each error is handed to its strategy in isolation: a strategy error or
//! panic is logged and yields no candidate for that error only. Output
//! order always follows the prioritized input order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult, StrategyError};
use crate::domain::models::{ErrorRecord, FailureAnalysis, FixCandidate};
use crate::domain::ports::{SourceReader, StrategyContext, StrategySettings};
use crate::services::strategies::StrategyRegistry;

/// Upper bound accepted for `max_concurrency`.
pub const MAX_CONCURRENCY: usize = 64;

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// Run the strategy for one error, converting every failure into `None`.
fn dispatch_one(
    registry: &StrategyRegistry,
    record: &ErrorRecord,
    ctx: &StrategyContext<'_>,
) -> Option<FixCandidate> {
    let strategy = registry.strategy_for_kind(&record.kind);
    let outcome = catch_unwind(AssertUnwindSafe(|| strategy.propose(record, ctx)))
        .unwrap_or_else(|payload| Err(StrategyError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(Some(candidate)) => Some(candidate),
        Ok(None) => {
            debug!(
                kind = %record.kind,
                job = %record.job_name,
                strategy = %strategy.id(),
                "no fix proposed"
            );
            None
        }
        Err(err) => {
            warn!(
                kind = %record.kind,
                job = %record.job_name,
                strategy = %strategy.id(),
                error = %err,
                "strategy failed, skipping error"
            );
            None
        }
    }
}

/// Invokes strategies for prioritized errors.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<StrategyRegistry>,
    sources: Arc<dyn SourceReader>,
    settings: Arc<StrategySettings>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        registry: Arc<StrategyRegistry>,
        sources: Arc<dyn SourceReader>,
        settings: StrategySettings,
    ) -> Self {
        Self {
            registry,
            sources,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    /// Single synchronous pass.
    #[instrument(skip_all, fields(errors = ordered.len()))]
    pub fn dispatch(&self, analysis: &FailureAnalysis, ordered: &[ErrorRecord]) -> Vec<FixCandidate> {
        let ctx = StrategyContext::new(analysis, self.sources.as_ref(), &self.settings);
        ordered
            .iter()
            .filter_map(|record| dispatch_one(&self.registry, record, &ctx))
            .collect()
    }

    /// Bounded-parallel pass on the blocking pool.
    ///
    /// At most `max_concurrency` strategies run at once. Each result lands
    /// in the slot of its input position, so the output equals
    /// [`dispatch`](Self::dispatch) for the same input.
    #[instrument(skip_all, fields(errors = ordered.len(), max_concurrency = max_concurrency))]
    pub async fn dispatch_concurrent(
        &self,
        analysis: Arc<FailureAnalysis>,
        ordered: Vec<ErrorRecord>,
        max_concurrency: usize,
    ) -> DomainResult<Vec<FixCandidate>> {
        let semaphore = Arc::new(Semaphore::new(max_concurrency.clamp(1, MAX_CONCURRENCY)));
        let mut handles = Vec::with_capacity(ordered.len());

        for record in ordered {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| DomainError::DispatchFailed("semaphore closed".to_string()))?;

            let registry = Arc::clone(&self.registry);
            let sources = Arc::clone(&self.sources);
            let settings = Arc::clone(&self.settings);
            let analysis = Arc::clone(&analysis);

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let ctx = StrategyContext::new(&analysis, sources.as_ref(), &settings);
                dispatch_one(&registry, &record, &ctx)
            });
            handles.push(handle);
        }

        let mut slots: Vec<Option<FixCandidate>> = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(result) => slots.push(result),
                Err(err) => {
                    warn!(index, error = %err, "dispatch task did not complete");
                    slots.push(None);
                }
            }
        }
        Ok(slots.into_iter().flatten().collect())
    }
}
