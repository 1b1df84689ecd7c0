//! Linter strategies: blank lines, long imports, trailing whitespace and
//! unused imports.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorRecord, FixCandidate, LineEdit, Patch};
use crate::domain::ports::{FixStrategy, StrategyContext, StrategyId};
use crate::services::diagnostics::{
    parse_blank_lines, parse_lint, parse_python_import, parse_unused_import, BlankLineCount,
    LintDiagnostic,
};
use crate::services::taxonomy::{confidence, MAX_BLANK_LINES};

static LINT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?P<code>[EWFC]\d{3})\b").expect("lint code pattern must compile"));

/// Flake8 diagnostic from the message, or from the record's file/line hints
/// plus a code found anywhere in the message.
fn lint_diagnostic(record: &ErrorRecord) -> Option<LintDiagnostic> {
    if let Some(diag) = parse_lint(&record.message) {
        return Some(diag);
    }
    let (file, line) = (record.file.as_ref()?, record.line.filter(|&line| line > 0)?);
    let caps = LINT_CODE.captures(&record.message)?;
    let code = caps.name("code")?;
    Some(LintDiagnostic {
        file: file.clone(),
        line,
        column: 1,
        code: code.as_str().to_string(),
        text: record.message[code.end()..].trim().to_string(),
    })
}

/// Handles `lint-style` errors.
#[derive(Debug, Default)]
pub struct LintStyleStrategy;

impl LintStyleStrategy {
    fn blank_lines(
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
        diag: &LintDiagnostic,
    ) -> Option<FixCandidate> {
        let count = parse_blank_lines(&diag.text).unwrap_or(BlankLineCount {
            expected: 2,
            found: 0,
        });
        let missing = count.missing();
        if missing == 0 {
            return None;
        }
        if missing > MAX_BLANK_LINES {
            debug!(file = %diag.file, line = diag.line, missing, "implausible blank-line count");
            return None;
        }
        let lines = vec![String::new(); missing as usize];
        let candidate = ctx
            .candidate(
                record,
                format!(
                    "Insert {missing} blank line(s) before line {} in {} ({})",
                    diag.line, diag.file, diag.code
                ),
                confidence::BLANK_LINES,
            )
            .with_target(&diag.file)
            .with_patch(Patch::single(LineEdit::Insert {
                line: diag.line,
                lines,
            }));
        Some(candidate)
    }

    fn long_import(
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
        diag: &LintDiagnostic,
    ) -> StrategyResult<Option<FixCandidate>> {
        let text = ctx.sources.read_line(&diag.file, diag.line)?;
        let Some(wrapped) = parse_python_import(&text).and_then(|import| import.render_wrapped())
        else {
            debug!(file = %diag.file, line = diag.line, "E501 is not on a single-line from-import");
            return Ok(None);
        };
        let candidate = ctx
            .candidate(
                record,
                format!(
                    "Split long import on line {} of {} into a parenthesised block",
                    diag.line, diag.file
                ),
                confidence::LONG_IMPORT_SPLIT,
            )
            .with_target(&diag.file)
            .with_patch(Patch::single(LineEdit::Replace {
                line: diag.line,
                expected: Some(text),
                lines: wrapped,
            }));
        Ok(Some(candidate))
    }

    fn trailing_whitespace(
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
        diag: &LintDiagnostic,
    ) -> StrategyResult<Option<FixCandidate>> {
        let text = ctx.sources.read_line(&diag.file, diag.line)?;
        let trimmed = text.trim_end().to_string();
        if trimmed == text {
            return Ok(None);
        }
        let candidate = ctx
            .candidate(
                record,
                format!("Strip trailing whitespace on line {} of {}", diag.line, diag.file),
                confidence::TRAILING_WHITESPACE,
            )
            .with_target(&diag.file)
            .with_patch(Patch::single(LineEdit::Replace {
                line: diag.line,
                expected: Some(text),
                lines: vec![trimmed],
            }));
        Ok(Some(candidate))
    }
}

impl FixStrategy for LintStyleStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::LintStyle
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let Some(diag) = lint_diagnostic(record) else {
            return Ok(None);
        };
        match diag.code.as_str() {
            "E302" | "E305" => Ok(Self::blank_lines(record, ctx, &diag)),
            "E501" => Self::long_import(record, ctx, &diag),
            "W291" | "W293" => Self::trailing_whitespace(record, ctx, &diag),
            "F401" => match parse_unused_import(&record.message) {
                Some(symbol) => remove_unused_import(
                    record,
                    ctx,
                    Some(diag.file.clone()),
                    Some(diag.line),
                    &symbol,
                ),
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }
}

/// Handles `lint-unused-import` errors.
#[derive(Debug, Default)]
pub struct UnusedImportStrategy;

impl FixStrategy for UnusedImportStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::UnusedImport
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let Some(symbol) = parse_unused_import(&record.message) else {
            return Ok(None);
        };
        let (file, line) = match lint_diagnostic(record) {
            Some(diag) => (Some(diag.file), Some(diag.line)),
            None => (record.file.clone(), record.line),
        };
        remove_unused_import(record, ctx, file, line, &symbol)
    }
}

/// Edit removing `symbol` from the import on `line`, if that line imports it.
fn import_edit(line: u32, text: &str, symbol: &str) -> Option<LineEdit> {
    let import = parse_python_import(text)?;
    let index = import.position_of(symbol)?;
    Some(match import.without(index) {
        Some(rest) => LineEdit::Replace {
            line,
            expected: Some(text.to_string()),
            lines: vec![rest.render()],
        },
        None => LineEdit::Delete {
            line,
            expected: Some(text.to_string()),
        },
    })
}

fn remove_unused_import(
    record: &ErrorRecord,
    ctx: &StrategyContext<'_>,
    file: Option<String>,
    line: Option<u32>,
    symbol: &str,
) -> StrategyResult<Option<FixCandidate>> {
    let Some(file) = file else {
        return Ok(None);
    };

    let edits = match ctx.sources.read_lines(&file) {
        Ok(lines) => {
            let at_line = line
                .and_then(|n| {
                    let text = lines.get(usize::try_from(n).ok()?.checked_sub(1)?)?;
                    import_edit(n, text, symbol)
                })
                .into_iter()
                .collect::<Vec<_>>();
            if at_line.is_empty() {
                lines
                    .iter()
                    .zip(1u32..)
                    .filter_map(|(text, n)| import_edit(n, text, symbol))
                    .collect()
            } else {
                at_line
            }
        }
        Err(err) => match line {
            Some(n) => {
                debug!(file = %file, error = %err, "source unavailable, deleting reported line blind");
                vec![LineEdit::Delete {
                    line: n,
                    expected: None,
                }]
            }
            None => return Err(err),
        },
    };

    if edits.is_empty() {
        return Ok(None);
    }

    let candidate = ctx
        .candidate(
            record,
            format!("Remove unused import '{symbol}' from {file}"),
            confidence::UNUSED_IMPORT,
        )
        .with_target(file)
        .with_patch(Patch { edits });
    Ok(Some(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ErrorKind;
    use crate::services::strategies::test_support::Fixture;

    fn record(kind: ErrorKind, message: &str) -> ErrorRecord {
        ErrorRecord::new(kind, message, "lint")
    }

    #[test]
    fn test_e302_inserts_two_blank_lines() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintStyle, "app.py:10:1: E302 expected 2 blank lines");
        let candidate = LintStyleStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");

        assert_eq!(candidate.target_file.as_deref(), Some("app.py"));
        assert!((candidate.confidence - 0.95).abs() < f64::EPSILON);
        assert!(!candidate.requires_human_review);
        assert_eq!(
            candidate.patch,
            Some(Patch::single(LineEdit::Insert {
                line: 10,
                lines: vec![String::new(), String::new()],
            }))
        );
    }

    #[test]
    fn test_oversized_blank_line_count_is_refused() {
        let fixture = Fixture::new();
        for message in [
            "app.py:1:1: E302 expected 4294967295 blank lines",
            "app.py:1:1: E305 expected 3000000 blank lines, found 0",
            "app.py:1:1: E302 expected 3 blank lines",
        ] {
            let rec = record(ErrorKind::LintStyle, message);
            assert_eq!(LintStyleStrategy.propose(&rec, &fixture.ctx()).expect("no error"), None);
        }
    }

    #[test]
    fn test_line_zero_is_not_a_location() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintStyle, "app.py:0:1: E302 expected 2 blank lines");
        assert_eq!(LintStyleStrategy.propose(&rec, &fixture.ctx()).expect("no error"), None);

        let mut hinted = record(ErrorKind::LintStyle, "E302 expected 2 blank lines");
        hinted.file = Some("app.py".to_string());
        hinted.line = Some(0);
        assert_eq!(LintStyleStrategy.propose(&hinted, &fixture.ctx()).expect("no error"), None);
    }

    #[test]
    fn test_e302_with_found_inserts_difference() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintStyle, "app.py:4:1: E302 expected 2 blank lines, found 1");
        let candidate = LintStyleStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        let Some(Patch { edits }) = candidate.patch else {
            panic!("expected patch");
        };
        assert_eq!(edits, vec![LineEdit::Insert { line: 4, lines: vec![String::new()] }]);
    }

    #[test]
    fn test_e501_on_import_line_is_wrapped() {
        let fixture = Fixture::new().with_file(
            "utils.py",
            "import os\nfrom typing import Any, Callable, Dict, Iterable, List, Optional, Sequence, Tuple\n",
        );
        let rec = record(ErrorKind::LintStyle, "utils.py:2:80: E501 line too long (83 > 79 characters)");
        let candidate = LintStyleStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");

        assert!((candidate.confidence - 0.85).abs() < f64::EPSILON);
        let Some(Patch { edits }) = candidate.patch else {
            panic!("expected patch");
        };
        let LineEdit::Replace { line, expected, lines } = &edits[0] else {
            panic!("expected replace");
        };
        assert_eq!(*line, 2);
        assert!(expected.as_deref().is_some_and(|e| e.starts_with("from typing import")));
        assert_eq!(lines.first().map(String::as_str), Some("from typing import ("));
        assert_eq!(lines.last().map(String::as_str), Some(")"));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_e501_on_code_line_has_no_fix() {
        let fixture = Fixture::new().with_file("utils.py", "x = 'a very long line'\n");
        let rec = record(ErrorKind::LintStyle, "utils.py:1:80: E501 line too long (99 > 79 characters)");
        assert!(LintStyleStrategy.propose(&rec, &fixture.ctx()).expect("no error").is_none());
    }

    #[test]
    fn test_e501_with_missing_file_is_strategy_error() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintStyle, "gone.py:1:80: E501 line too long (99 > 79 characters)");
        assert!(LintStyleStrategy.propose(&rec, &fixture.ctx()).is_err());
    }

    #[test]
    fn test_trailing_whitespace() {
        let fixture = Fixture::new().with_file("a.py", "x = 1   \ny = 2\n");
        let rec = record(ErrorKind::LintStyle, "a.py:1:6: W291 trailing whitespace");
        let candidate = LintStyleStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert_eq!(
            candidate.patch,
            Some(Patch::single(LineEdit::Replace {
                line: 1,
                expected: Some("x = 1   ".to_string()),
                lines: vec!["x = 1".to_string()],
            }))
        );
    }

    #[test]
    fn test_unrecognised_code_and_shape_yield_nothing() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintStyle, "app.py:1:1: E999 SyntaxError");
        assert!(LintStyleStrategy.propose(&rec, &fixture.ctx()).expect("no error").is_none());
        let rec = record(ErrorKind::LintStyle, "style problems somewhere");
        assert!(LintStyleStrategy.propose(&rec, &fixture.ctx()).expect("no error").is_none());
    }

    #[test]
    fn test_hints_fill_in_missing_location() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintStyle, "E302 expected 2 blank lines, found 0")
            .with_file("pkg/mod.py")
            .with_line(7);
        let candidate = LintStyleStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert_eq!(candidate.target_file.as_deref(), Some("pkg/mod.py"));
    }

    #[test]
    fn test_unused_import_deletes_single_name_import() {
        let fixture = Fixture::new().with_file("utils.py", "import os\nimport sys\n\nprint(sys.argv)\n");
        let rec = record(ErrorKind::LintUnusedImport, "utils.py:1:1: F401 'os' imported but unused");
        let candidate = UnusedImportStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");

        assert!((candidate.confidence - 0.92).abs() < f64::EPSILON);
        assert_eq!(
            candidate.patch,
            Some(Patch::single(LineEdit::Delete {
                line: 1,
                expected: Some("import os".to_string()),
            }))
        );
    }

    #[test]
    fn test_unused_import_rewrites_multi_name_import() {
        let fixture = Fixture::new().with_file("utils.py", "from os import path, sep\n");
        let rec = record(ErrorKind::LintUnusedImport, "utils.py:1:1: F401 'os.sep' imported but unused");
        let candidate = UnusedImportStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert_eq!(
            candidate.patch,
            Some(Patch::single(LineEdit::Replace {
                line: 1,
                expected: Some("from os import path, sep".to_string()),
                lines: vec!["from os import path".to_string()],
            }))
        );
    }

    #[test]
    fn test_unused_import_scans_file_without_line() {
        let fixture = Fixture::new().with_file("m.py", "import json\nx = 1\nimport json\n");
        let rec = record(ErrorKind::LintUnusedImport, "'json' imported but unused").with_file("m.py");
        let candidate = UnusedImportStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert_eq!(candidate.patch.map(|p| p.edits.len()), Some(2));
    }

    #[test]
    fn test_unused_import_blind_delete_when_file_unreadable() {
        let fixture = Fixture::new();
        let rec = record(ErrorKind::LintUnusedImport, "utils.py:3:1: F401 'os' imported but unused");
        let candidate = UnusedImportStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert_eq!(
            candidate.patch,
            Some(Patch::single(LineEdit::Delete { line: 3, expected: None }))
        );
    }

    #[test]
    fn test_f401_under_lint_style_is_handled() {
        let fixture = Fixture::new().with_file("a.py", "import re\n");
        let rec = record(ErrorKind::LintStyle, "a.py:1:1: F401 're' imported but unused");
        let candidate = LintStyleStrategy
            .propose(&rec, &fixture.ctx())
            .expect("no error")
            .expect("candidate");
        assert!((candidate.confidence - 0.92).abs() < f64::EPSILON);
    }
}
