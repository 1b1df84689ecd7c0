//! Closed taxonomy of CI error kinds.
//!
//! Upstream producers tag every reported error with a string. The tag is
//! parsed into [`ErrorKind`] by [`ErrorKind::from_tag`], which is total:
//! tags outside the vocabulary become [`ErrorKind::Unknown`] and keep their
//! original text so it can be echoed back in the report.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of a single reported failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Linter style diagnostic (flake8 `E`/`W` codes).
    LintStyle,
    /// Linter "imported but unused" diagnostic.
    LintUnusedImport,
    /// Formatter check failure (black, prettier, rustfmt).
    FormatViolation,
    /// `AttributeError` raised at runtime.
    RuntimeAttributeError,
    /// `ImportError` / `ModuleNotFoundError` raised at runtime.
    RuntimeImportError,
    /// `ValueError` raised at runtime.
    RuntimeValueError,
    /// Failing test case.
    TestFailure,
    /// Failing assertion outside a recognised test report.
    AssertionFailure,
    /// Compiler or type-checker error.
    CompilationError,
    /// Package missing from the environment.
    DependencyMissing,
    /// npm peer dependency not installed.
    PeerDependencyMissing,
    /// Finding reported by a dependency audit tool.
    SecurityVulnerability,
    /// Explicitly unclassified error.
    #[default]
    Unclassified,
    /// Tag outside the vocabulary; carries the tag as reported.
    Unknown(String),
}

impl ErrorKind {
    /// Every kind of the closed vocabulary, in declaration order.
    pub const KNOWN: [Self; 13] = [
        Self::LintStyle,
        Self::LintUnusedImport,
        Self::FormatViolation,
        Self::RuntimeAttributeError,
        Self::RuntimeImportError,
        Self::RuntimeValueError,
        Self::TestFailure,
        Self::AssertionFailure,
        Self::CompilationError,
        Self::DependencyMissing,
        Self::PeerDependencyMissing,
        Self::SecurityVulnerability,
        Self::Unclassified,
    ];

    /// Parse a tag. Never fails.
    ///
    /// Tags are normalised first: surrounding whitespace is trimmed, the
    /// tag is lower-cased and `_` or inner whitespace become `-`.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = normalize_tag(tag);
        match normalized.as_str() {
            "lint-style" => Self::LintStyle,
            "lint-unused-import" => Self::LintUnusedImport,
            "format-violation" => Self::FormatViolation,
            "runtime-attribute-error" => Self::RuntimeAttributeError,
            "runtime-import-error" => Self::RuntimeImportError,
            "runtime-value-error" => Self::RuntimeValueError,
            "test-failure" => Self::TestFailure,
            "assertion-failure" => Self::AssertionFailure,
            "compilation-error" => Self::CompilationError,
            "dependency-missing" => Self::DependencyMissing,
            "peer-dependency-missing" => Self::PeerDependencyMissing,
            "security-vulnerability" => Self::SecurityVulnerability,
            "unclassified" => Self::Unclassified,
            _ => Self::Unknown(tag.to_string()),
        }
    }

    /// Canonical tag. Unknown kinds return the tag they were parsed from.
    pub fn as_tag(&self) -> &str {
        match self {
            Self::LintStyle => "lint-style",
            Self::LintUnusedImport => "lint-unused-import",
            Self::FormatViolation => "format-violation",
            Self::RuntimeAttributeError => "runtime-attribute-error",
            Self::RuntimeImportError => "runtime-import-error",
            Self::RuntimeValueError => "runtime-value-error",
            Self::TestFailure => "test-failure",
            Self::AssertionFailure => "assertion-failure",
            Self::CompilationError => "compilation-error",
            Self::DependencyMissing => "dependency-missing",
            Self::PeerDependencyMissing => "peer-dependency-missing",
            Self::SecurityVulnerability => "security-vulnerability",
            Self::Unclassified => "unclassified",
            Self::Unknown(tag) => tag,
        }
    }

    /// Whether the tag was outside the closed vocabulary.
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// Lower-case, trim, and fold `_`/whitespace runs into `-`.
pub fn normalize_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut pending_dash = false;
    for ch in tag.trim().chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.extend(ch.to_lowercase());
    }
    out
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> Deserialize<'de> for ErrorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_round_trip() {
        for kind in ErrorKind::KNOWN {
            assert_eq!(ErrorKind::from_tag(kind.as_tag()), kind);
        }
    }

    #[test]
    fn test_tag_normalization() {
        assert_eq!(ErrorKind::from_tag("Lint_Style"), ErrorKind::LintStyle);
        assert_eq!(ErrorKind::from_tag("  test failure "), ErrorKind::TestFailure);
        assert_eq!(ErrorKind::from_tag("SECURITY--vulnerability"), ErrorKind::SecurityVulnerability);
    }

    #[test]
    fn test_unknown_tag_keeps_original_text() {
        let kind = ErrorKind::from_tag("Mystery_Tool");
        assert!(kind.is_unknown());
        assert_eq!(kind.as_tag(), "Mystery_Tool");
    }

    #[test]
    fn test_empty_tag_is_unknown() {
        assert!(ErrorKind::from_tag("").is_unknown());
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("__Peer_Dependency  Missing"), "peer-dependency-missing");
        assert_eq!(normalize_tag("flake8"), "flake8");
    }
}
