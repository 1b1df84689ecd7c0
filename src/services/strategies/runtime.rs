use super::dependency::{missing_python_module, requirement_fix};
use super::packages::find_known_incompatibility;
use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorKind, ErrorRecord, FixCandidate};
use crate::domain::ports::{FixStrategy, StrategyContext, StrategyId};
use crate::services::diagnostics::parse_missing_python_module;
use crate::services::taxonomy::confidence;

/// Handles runtime import, attribute and value errors.
///
/// Only failures with a recognisable dependency cause get a fix: a known
/// upstream incompatibility is pinned, and an import of a missing module
/// adds the distribution. Everything else yields no candidate.
#[derive(Debug, Default)]
pub struct RuntimeStrategy;

impl FixStrategy for RuntimeStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Runtime
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        if let Some(known) = find_known_incompatibility(&record.message) {
            let distribution = known.pin.split("==").next().unwrap_or(known.pin);
            return Ok(Some(requirement_fix(
                record,
                ctx,
                distribution,
                known.pin,
                format!("Pin {} ({})", known.pin, known.reason),
                confidence::KNOWN_INCOMPATIBILITY,
            )));
        }

        if record.kind == ErrorKind::RuntimeImportError {
            if let Some(module) = parse_missing_python_module(&record.message) {
                return Ok(Some(missing_python_module(record, ctx, &module)));
            }
        }
        Ok(None)
    }
}
