//! Error taxonomy: priority table, strategy mapping and confidence constants.
//!
//! The lookups here are total over the tag domain. Unknown kinds get the
//! lowest priority and the manual-review strategy instead of an error.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::models::error_kind::normalize_tag;
use crate::domain::models::{ErrorKind, ErrorRecord, TaxonomyConfig};
use crate::domain::ports::StrategyId;

/// Priority given to unknown and unclassified kinds.
pub const LOWEST_PRIORITY: u8 = 0;

/// Most blank lines a blank-line fix will insert. pycodestyle never asks
/// for more than two.
pub const MAX_BLANK_LINES: u32 = 2;

/// Confidence values, one per (kind, sub-case).
pub mod confidence {
    /// E302/E305 missing blank lines.
    pub const BLANK_LINES: f64 = 0.95;
    /// E501 on an import line, split into a parenthesised import.
    pub const LONG_IMPORT_SPLIT: f64 = 0.85;
    /// W291/W293 trailing whitespace.
    pub const TRAILING_WHITESPACE: f64 = 0.90;
    /// F401 unused import removal.
    pub const UNUSED_IMPORT: f64 = 0.92;
    /// Delegating to a formatter.
    pub const FORMATTER: f64 = 0.98;
    /// Known library incompatibility pinned to a working version.
    pub const KNOWN_INCOMPATIBILITY: f64 = 0.94;
    /// Missing module that maps to a well-known distribution.
    pub const WELL_KNOWN_DEPENDENCY: f64 = 0.88;
    /// Missing module with an arbitrary name.
    pub const UNKNOWN_DEPENDENCY: f64 = 0.75;
    /// Peer dependency parsed from the npm warning.
    pub const PEER_DEPENDENCY: f64 = 0.80;
    /// Peer conflict we could not parse; fall back to legacy resolution.
    pub const PEER_DEPENDENCY_FALLBACK: f64 = 0.50;
    /// Dependency audit-fix command.
    pub const SECURITY_AUDIT: f64 = 0.60;
    /// Test failure surfaced for review.
    pub const TEST_FAILURE: f64 = 0.30;
    /// Assertion failure surfaced for review.
    pub const ASSERTION_FAILURE: f64 = 0.25;
    /// Compilation error surfaced for review.
    pub const COMPILATION_ERROR: f64 = 0.20;
    /// Unclassified or unknown error surfaced for review.
    pub const MANUAL_REVIEW: f64 = 0.10;

    /// Every named confidence, for display and auditing.
    pub const ALL: &[(&str, f64)] = &[
        ("formatter", FORMATTER),
        ("blank-lines", BLANK_LINES),
        ("known-incompatibility", KNOWN_INCOMPATIBILITY),
        ("unused-import", UNUSED_IMPORT),
        ("trailing-whitespace", TRAILING_WHITESPACE),
        ("well-known-dependency", WELL_KNOWN_DEPENDENCY),
        ("long-import-split", LONG_IMPORT_SPLIT),
        ("peer-dependency", PEER_DEPENDENCY),
        ("unknown-dependency", UNKNOWN_DEPENDENCY),
        ("security-audit", SECURITY_AUDIT),
        ("peer-dependency-fallback", PEER_DEPENDENCY_FALLBACK),
        ("test-failure", TEST_FAILURE),
        ("assertion-failure", ASSERTION_FAILURE),
        ("compilation-error", COMPILATION_ERROR),
        ("manual-review", MANUAL_REVIEW),
    ];
}

/// Priority of `kind`; higher is handled first.
pub fn priority_of(kind: &ErrorKind) -> u8 {
    match kind {
        ErrorKind::CompilationError => 95,
        ErrorKind::DependencyMissing => 90,
        ErrorKind::RuntimeImportError => 85,
        ErrorKind::PeerDependencyMissing => 80,
        ErrorKind::RuntimeAttributeError => 75,
        ErrorKind::RuntimeValueError => 70,
        ErrorKind::SecurityVulnerability => 65,
        ErrorKind::TestFailure => 60,
        ErrorKind::AssertionFailure => 55,
        ErrorKind::LintUnusedImport => 40,
        ErrorKind::LintStyle => 35,
        ErrorKind::FormatViolation => 30,
        ErrorKind::Unclassified | ErrorKind::Unknown(_) => LOWEST_PRIORITY,
    }
}

/// Strategy family responsible for `kind`.
pub fn strategy_for(kind: &ErrorKind) -> StrategyId {
    match kind {
        ErrorKind::LintStyle => StrategyId::LintStyle,
        ErrorKind::LintUnusedImport => StrategyId::UnusedImport,
        ErrorKind::FormatViolation => StrategyId::Formatter,
        ErrorKind::RuntimeAttributeError
        | ErrorKind::RuntimeImportError
        | ErrorKind::RuntimeValueError => StrategyId::Runtime,
        ErrorKind::DependencyMissing => StrategyId::Dependency,
        ErrorKind::PeerDependencyMissing => StrategyId::PeerDependency,
        ErrorKind::TestFailure | ErrorKind::AssertionFailure | ErrorKind::CompilationError => {
            StrategyId::FailureReview
        }
        ErrorKind::SecurityVulnerability => StrategyId::SecurityAudit,
        ErrorKind::Unclassified | ErrorKind::Unknown(_) => StrategyId::ManualReview,
    }
}

/// One row of the taxonomy table, for display.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyEntry {
    pub kind: String,
    pub priority: u8,
    pub strategy: StrategyId,
}

/// Tag resolution with producer-specific aliases.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    aliases: HashMap<String, ErrorKind>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration. Alias keys are normalised; targets are
    /// parsed with [`ErrorKind::from_tag`], so an alias to an unknown tag
    /// stays unknown.
    pub fn from_config(config: &TaxonomyConfig) -> Self {
        let aliases = config
            .aliases
            .iter()
            .map(|(alias, target)| {
                let kind = ErrorKind::from_tag(target);
                if kind.is_unknown() {
                    warn!(alias = %alias, target = %target, "taxonomy alias points at an unknown kind");
                }
                (normalize_tag(alias), kind)
            })
            .collect();
        Self { aliases }
    }

    /// Resolve aliases for unknown kinds; known kinds pass through.
    pub fn resolve(&self, kind: &ErrorKind) -> ErrorKind {
        match kind {
            ErrorKind::Unknown(tag) => self
                .aliases
                .get(&normalize_tag(tag))
                .cloned()
                .unwrap_or_else(|| kind.clone()),
            _ => kind.clone(),
        }
    }

    /// Copy of `record` with its kind resolved.
    pub fn resolve_record(&self, record: &ErrorRecord) -> ErrorRecord {
        let mut resolved = record.clone();
        resolved.kind = self.resolve(&record.kind);
        resolved
    }

    /// Number of configured aliases.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// The full table, highest priority first.
    pub fn entries() -> Vec<TaxonomyEntry> {
        let mut entries: Vec<TaxonomyEntry> = ErrorKind::KNOWN
            .iter()
            .map(|kind| TaxonomyEntry {
                kind: kind.as_tag().to_string(),
                priority: priority_of(kind),
                strategy: strategy_for(kind),
            })
            .collect();
        entries.sort_by(|a, b| b.priority.cmp(&a.priority));
        entries
    }
}
