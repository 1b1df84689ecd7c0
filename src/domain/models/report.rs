//! Output model: consolidated fixes and the final report.

use serde::{Deserialize, Serialize};

use super::fix::FixCandidate;

/// All candidates sharing one consolidation key, plus the chosen
/// representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedFix {
    /// Target file path, or `None` for file-less (command) fixes.
    pub target_file: Option<String>,
    /// Consolidation key: the target file, or a synthetic key.
    pub group_key: String,
    /// Equal to `representative.confidence`.
    pub confidence: f64,
    pub representative: FixCandidate,
    /// Members in dispatch order.
    pub candidates: Vec<FixCandidate>,
}

/// Final engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    pub ok: bool,
    pub total_errors: usize,
    pub fixable_errors: usize,
    pub overall_confidence: f64,
    pub consolidated: Vec<ConsolidatedFix>,
    pub run_error: Option<String>,
}

impl FixReport {
    /// Report for a run that could not produce any result.
    pub fn failed(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "pipeline failed".to_string();
        }
        Self {
            ok: false,
            total_errors: 0,
            fixable_errors: 0,
            overall_confidence: 0.0,
            consolidated: Vec::new(),
            run_error: Some(message),
        }
    }

    /// Process exit code for this report.
    pub const fn exit_code(&self) -> i32 {
        if self.ok {
            0
        } else {
            1
        }
    }

    /// All candidates in consolidated order.
    pub fn candidates(&self) -> impl Iterator<Item = &FixCandidate> {
        self.consolidated.iter().flat_map(|group| group.candidates.iter())
    }
}
