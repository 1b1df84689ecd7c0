//! Missing-dependency strategies for Python and npm projects.

use tracing::debug;

use super::packages::{is_well_known_node_package, well_known_python_distribution};
use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorRecord, FixCandidate, LineEdit, Patch};
use crate::domain::ports::{FixStrategy, StrategyContext, StrategyId};
use crate::services::diagnostics::{
    parse_missing_node_package, parse_missing_python_module, parse_peer_requirement,
};
use crate::services::taxonomy::confidence;

/// Fallback when a peer conflict could not be parsed.
pub const LEGACY_PEER_INSTALL: &str = "npm install --legacy-peer-deps";

/// Distribution name from a requirement line (`Foo[extra]>=1.0  # c` -> `Foo`).
fn requirement_name(line: &str) -> Option<&str> {
    let line = line.split('#').next()?.trim();
    if line.is_empty() || line.starts_with('-') {
        return None;
    }
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(line.len());
    Some(&line[..end])
}

fn same_distribution(a: &str, b: &str) -> bool {
    let canon = |s: &str| s.to_ascii_lowercase().replace('_', "-");
    canon(a) == canon(b)
}

/// Candidate that makes `requirement` part of the requirements file.
///
/// An existing entry for the same distribution is replaced; otherwise the
/// requirement is appended. If the entry already matches exactly, the
/// package is declared but missing from the environment, so the fix is a
/// reinstall command instead. An unreadable requirements file is treated as
/// empty.
pub(super) fn requirement_fix(
    record: &ErrorRecord,
    ctx: &StrategyContext<'_>,
    distribution: &str,
    requirement: &str,
    description: String,
    confidence: f64,
) -> FixCandidate {
    let path = ctx.settings.requirements_file.as_str();
    let lines = ctx.sources.read_lines(path).unwrap_or_else(|err| {
        debug!(path, error = %err, "requirements file unreadable, appending");
        Vec::new()
    });
    let existing = lines.iter().zip(1u32..).find(|(line, _)| {
        requirement_name(line).is_some_and(|name| same_distribution(name, distribution))
    });

    let candidate = ctx.candidate(record, description, confidence).with_target(path);
    match existing {
        Some((line, _)) if line.trim() == requirement => {
            candidate.with_command(format!("pip install -r {path}"))
        }
        Some((line, number)) => candidate.with_patch(Patch::single(LineEdit::Replace {
            line: number,
            expected: Some(line.clone()),
            lines: vec![requirement.to_string()],
        })),
        None => candidate.with_patch(Patch::single(LineEdit::Append {
            lines: vec![requirement.to_string()],
        })),
    }
}

/// Candidate adding the distribution behind a missing Python module.
pub(super) fn missing_python_module(
    record: &ErrorRecord,
    ctx: &StrategyContext<'_>,
    module: &str,
) -> FixCandidate {
    let (distribution, confidence) = match well_known_python_distribution(module) {
        Some(dist) => (dist, confidence::WELL_KNOWN_DEPENDENCY),
        None => (module, confidence::UNKNOWN_DEPENDENCY),
    };
    requirement_fix(
        record,
        ctx,
        distribution,
        distribution,
        format!(
            "Add {distribution} to {} (module '{module}' not found)",
            ctx.settings.requirements_file
        ),
        confidence,
    )
}

/// Handles `dependency-missing` errors.
#[derive(Debug, Default)]
pub struct DependencyStrategy;

impl FixStrategy for DependencyStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Dependency
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        if let Some(module) = parse_missing_python_module(&record.message) {
            return Ok(Some(missing_python_module(record, ctx, &module)));
        }
        if let Some(package) = parse_missing_node_package(&record.message) {
            let confidence = if is_well_known_node_package(&package) {
                confidence::WELL_KNOWN_DEPENDENCY
            } else {
                confidence::UNKNOWN_DEPENDENCY
            };
            return Ok(Some(
                ctx.candidate(record, format!("Install npm package {package}"), confidence)
                    .with_command(format!("npm install {package}")),
            ));
        }
        Ok(None)
    }
}

/// Handles `peer-dependency-missing` errors.
#[derive(Debug, Default)]
pub struct PeerDependencyStrategy;

impl FixStrategy for PeerDependencyStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::PeerDependency
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let candidate = match parse_peer_requirement(&record.message) {
            Some(spec) => ctx
                .candidate(
                    record,
                    format!("Install missing peer dependency {spec}"),
                    confidence::PEER_DEPENDENCY,
                )
                .with_command(format!("npm install \"{spec}\"")),
            None => ctx
                .candidate(
                    record,
                    "Resolve peer dependency conflict with legacy peer resolution",
                    confidence::PEER_DEPENDENCY_FALLBACK,
                )
                .with_command(LEGACY_PEER_INSTALL),
        };
        Ok(Some(candidate))
    }
}
