use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorRecord, FixCandidate};
use crate::domain::ports::{FixStrategy, StrategyContext, StrategyId};
use crate::services::diagnostics::{detect_ecosystem, Ecosystem};
use crate::services::taxonomy::confidence;

/// Proposes the ecosystem's audit-fix command for vulnerability reports.
#[derive(Debug, Default)]
pub struct SecurityAuditStrategy;

impl FixStrategy for SecurityAuditStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::SecurityAudit
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let command = match detect_ecosystem(&record.message) {
            Ecosystem::Node => "npm audit fix".to_string(),
            Ecosystem::Python => format!("pip-audit --fix -r {}", ctx.settings.requirements_file),
            Ecosystem::Rust => "cargo update".to_string(),
        };
        Ok(Some(
            ctx.candidate(
                record,
                format!("Upgrade vulnerable dependencies with `{command}`"),
                confidence::SECURITY_AUDIT,
            )
            .with_command(command),
        ))
    }
}
