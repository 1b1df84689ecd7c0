//! Fix proposals produced by strategies.

use serde::{Deserialize, Serialize};

use super::analysis::ErrorRecord;
use super::error_kind::ErrorKind;

/// One line-oriented edit. Line numbers are 1-based and refer to the file
/// as it was when the proposal was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LineEdit {
    /// Insert `lines` before `line`.
    Insert { line: u32, lines: Vec<String> },
    /// Delete `line`.
    Delete {
        line: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
    },
    /// Replace `line` with `lines`.
    Replace {
        line: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
        lines: Vec<String>,
    },
    /// Append `lines` at the end of the file, creating it if needed.
    Append { lines: Vec<String> },
}

impl LineEdit {
    /// Line the edit anchors on, if any.
    pub const fn line(&self) -> Option<u32> {
        match self {
            Self::Insert { line, .. } | Self::Delete { line, .. } | Self::Replace { line, .. } => {
                Some(*line)
            }
            Self::Append { .. } => None,
        }
    }
}

/// Ordered list of edits against a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub edits: Vec<LineEdit>,
}

impl Patch {
    pub fn single(edit: LineEdit) -> Self {
        Self { edits: vec![edit] }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Confidence-scored remedy for one error.
///
/// Created by exactly one strategy invocation and never mutated afterwards;
/// consolidation only regroups candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixCandidate {
    pub target_file: Option<String>,
    pub description: String,
    pub patch: Option<Patch>,
    pub command: Option<String>,
    pub confidence: f64,
    pub error_kind: ErrorKind,
    pub original_message: String,
    pub job_name: String,
    pub requires_human_review: bool,
}

impl FixCandidate {
    /// Start a candidate for `record`. Confidence is clamped to `[0, 1]`;
    /// NaN becomes 0.
    pub fn for_record(record: &ErrorRecord, description: impl Into<String>, confidence: f64) -> Self {
        Self {
            target_file: None,
            description: description.into(),
            patch: None,
            command: None,
            confidence: clamp_confidence(confidence),
            error_kind: record.kind.clone(),
            original_message: record.message.clone(),
            job_name: record.job_name.clone(),
            requires_human_review: false,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target_file: impl Into<String>) -> Self {
        self.target_file = Some(target_file.into());
        self
    }

    #[must_use]
    pub fn with_target_opt(mut self, target_file: Option<String>) -> Self {
        self.target_file = target_file;
        self
    }

    #[must_use]
    pub fn with_patch(mut self, patch: Patch) -> Self {
        self.patch = Some(patch);
        self
    }

    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    #[must_use]
    pub const fn needing_review(mut self) -> Self {
        self.requires_human_review = true;
        self
    }

    /// Whether the candidate carries something an applier could act on.
    pub fn is_actionable(&self) -> bool {
        self.patch.as_ref().is_some_and(|p| !p.is_empty()) || self.command.is_some()
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ErrorRecord {
        ErrorRecord::new(ErrorKind::LintStyle, "app.py:1:1: E302", "lint")
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert!((FixCandidate::for_record(&record(), "d", 1.7).confidence - 1.0).abs() < f64::EPSILON);
        assert!(FixCandidate::for_record(&record(), "d", -0.2).confidence.abs() < f64::EPSILON);
        assert!(FixCandidate::for_record(&record(), "d", f64::NAN).confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn test_candidate_copies_record_fields() {
        let candidate = FixCandidate::for_record(&record(), "d", 0.5);
        assert_eq!(candidate.error_kind, ErrorKind::LintStyle);
        assert_eq!(candidate.job_name, "lint");
        assert_eq!(candidate.original_message, "app.py:1:1: E302");
        assert!(!candidate.is_actionable());
    }

    #[test]
    fn test_line_edit_wire_shape() {
        let edit = LineEdit::Insert { line: 10, lines: vec![String::new(), String::new()] };
        let value = serde_json::to_value(&edit).expect("serializable");
        assert_eq!(value["op"], "insert");
        assert_eq!(value["line"], 10);
        assert_eq!(value["lines"].as_array().map(Vec::len), Some(2));

        let delete = LineEdit::Delete { line: 3, expected: None };
        let value = serde_json::to_value(&delete).expect("serializable");
        assert!(value.get("expected").is_none());
        assert_eq!(delete.line(), Some(3));
        assert_eq!(LineEdit::Append { lines: vec![] }.line(), None);
    }
}
