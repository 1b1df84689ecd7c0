//! Typed parsers for the diagnostic grammars CI tools emit.
//!
//! Each parser takes raw text and returns a structured match (or `None`),
//! so strategies work with fields instead of capture groups.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("diagnostic pattern must compile")
}

static FLAKE8: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?m)(?P<file>[^\s:]+):(?P<line>\d+):(?P<col>\d+):\s*(?P<code>[A-Z]+\d+)\s*(?P<text>.*)$")
});
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| compile(r"expected (?P<expected>\d+) blank lines?(?:,\s*(?:found|got) (?P<found>\d+))?"));
static UNUSED_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"['"`](?P<symbol>[\w.]+)['"`] imported but unused"#));
static FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?P<indent>\s*)from\s+(?P<module>[\w.]+)\s+import\s+(?P<names>.+?)\s*(?P<comment>#.*)?$")
});
static PLAIN_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?P<indent>\s*)import\s+(?P<names>.+?)\s*(?P<comment>#.*)?$"));
static WOULD_REFORMAT: LazyLock<Regex> = LazyLock::new(|| compile(r"would reformat\s+(?P<file>\S+)"));
static PRETTIER_WARN: LazyLock<Regex> = LazyLock::new(|| compile(r"\[warn\]\s+(?P<file>\S+\.\w+)"));
static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?P<file>[\w./-]+\.(?:pyi|py|jsx|js|tsx|ts|mjs|cjs|json|css|scss|less|html|vue|yaml|yml|graphql|md|rs|go))\b")
});
static NO_MODULE_NAMED: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"No module named ['"](?P<module>[\w.]+)['"]"#));
static CANNOT_IMPORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"cannot import name ['"](?P<name>\w+)['"] from ['"](?P<module>[\w.]+)['"]"#)
});
static NODE_MISSING_MODULE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?:Cannot find module|Can't resolve) ['"](?P<module>[^'"]+)['"]"#)
});
static PEER_REQUIRES: LazyLock<Regex> =
    LazyLock::new(|| compile(r"requires a peer of (?P<spec>\S+?) but none"));
static PEER_FROM: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"peer (?P<name>@?[\w./-]+)@"?(?P<range>[^"\s]+)"? from"#));
static PYTEST_FAILED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"FAILED\s+(?P<file>[^\s:]+)(?:::(?P<test>\S+))?"));
static PY_TRACEBACK: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"File "(?P<file>[^"]+)", line (?P<line>\d+)"#));
static TSC_ERROR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?P<file>[^\s(]+)\((?P<line>\d+),(?P<col>\d+)\):\s*error"));
static RUSTC_ARROW: LazyLock<Regex> =
    LazyLock::new(|| compile(r"-->\s*(?P<file>[^\s:]+):(?P<line>\d+):(?P<col>\d+)"));
static GENERIC_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?P<file>[\w./-]+\.\w+):(?P<line>\d+)(?::\d+)?:"));

/// A `file:line:col: CODE message` linter diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub code: String,
    pub text: String,
}

/// Parse the first flake8-shaped diagnostic in `message`. Lines are
/// 1-based; line 0 is rejected.
pub fn parse_lint(message: &str) -> Option<LintDiagnostic> {
    let caps = FLAKE8.captures(message)?;
    Some(LintDiagnostic {
        file: caps["file"].to_string(),
        line: caps["line"].parse().ok().filter(|&line: &u32| line > 0)?,
        column: caps["col"].parse().ok()?,
        code: caps["code"].to_string(),
        text: caps["text"].trim().to_string(),
    })
}

/// Blank-line counts from an E30x message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankLineCount {
    pub expected: u32,
    pub found: u32,
}

impl BlankLineCount {
    /// Lines that have to be inserted to satisfy the rule.
    pub const fn missing(self) -> u32 {
        self.expected.saturating_sub(self.found)
    }
}

/// Parse "expected N blank lines[, found M]". `found` defaults to 0.
pub fn parse_blank_lines(text: &str) -> Option<BlankLineCount> {
    let caps = BLANK_LINES.captures(text)?;
    Some(BlankLineCount {
        expected: caps["expected"].parse().ok()?,
        found: caps
            .name("found")
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0),
    })
}

/// Symbol from "'x.y' imported but unused".
pub fn parse_unused_import(message: &str) -> Option<String> {
    UNUSED_IMPORT
        .captures(message)
        .map(|caps| caps["symbol"].to_string())
}

/// One name in an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportedName {
    /// Name the import binds in the module namespace.
    pub fn bound_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    fn render(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} as {alias}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A single-line Python import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonImport {
    pub indent: String,
    /// `Some` for `from module import ...`.
    pub module: Option<String>,
    pub names: Vec<ImportedName>,
    pub comment: Option<String>,
}

impl PythonImport {
    /// Whether this import brings `symbol` (as reported by flake8) into scope.
    ///
    /// flake8 reports `from a import b` as `a.b` and `import a.b` as `a.b`.
    pub fn references(&self, symbol: &str) -> bool {
        self.position_of(symbol).is_some()
    }

    /// Index of the name matching `symbol`.
    pub fn position_of(&self, symbol: &str) -> Option<usize> {
        self.names.iter().position(|n| {
            let qualified = match &self.module {
                Some(module) => format!("{module}.{}", n.name),
                None => n.name.clone(),
            };
            qualified == symbol || n.name == symbol || n.bound_name() == symbol
        })
    }

    /// The statement without the name at `index`, or `None` if nothing
    /// would remain.
    #[must_use]
    pub fn without(&self, index: usize) -> Option<Self> {
        if self.names.len() <= 1 || index >= self.names.len() {
            return None;
        }
        let mut rest = self.clone();
        rest.names.remove(index);
        Some(rest)
    }

    /// Render on one line.
    pub fn render(&self) -> String {
        let names = self
            .names
            .iter()
            .map(ImportedName::render)
            .collect::<Vec<_>>()
            .join(", ");
        let statement = match &self.module {
            Some(module) => format!("{}from {module} import {names}", self.indent),
            None => format!("{}import {names}", self.indent),
        };
        match &self.comment {
            Some(comment) => format!("{statement}  {comment}"),
            None => statement,
        }
    }

    /// Render a `from` import as a parenthesised block, one name per line.
    /// Plain imports cannot be parenthesised and yield `None`.
    pub fn render_wrapped(&self) -> Option<Vec<String>> {
        let module = self.module.as_ref()?;
        let head = match &self.comment {
            Some(comment) => format!("{}from {module} import (  {comment}", self.indent),
            None => format!("{}from {module} import (", self.indent),
        };
        let mut lines = vec![head];
        lines.extend(
            self.names
                .iter()
                .map(|n| format!("{}    {},", self.indent, n.render())),
        );
        lines.push(format!("{})", self.indent));
        Some(lines)
    }
}

fn parse_names(raw: &str) -> Option<Vec<ImportedName>> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('(')
        .map_or(raw, |inner| inner.strip_suffix(')').unwrap_or(inner));
    if raw.ends_with('\\') || raw.contains('(') || raw.contains(')') {
        return None;
    }
    let names: Vec<ImportedName> = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut pieces = part.split_whitespace();
            let name = pieces.next().unwrap_or_default().to_string();
            let alias = match (pieces.next(), pieces.next()) {
                (Some("as"), Some(alias)) => Some(alias.to_string()),
                _ => None,
            };
            ImportedName { name, alias }
        })
        .collect();
    if names.is_empty() || names.iter().any(|n| n.name.is_empty() || n.name == "*") {
        return None;
    }
    Some(names)
}

/// Parse one physical line as a complete Python import statement.
///
/// Multi-line (continued or open-paren) imports are not handled.
pub fn parse_python_import(line: &str) -> Option<PythonImport> {
    if let Some(caps) = FROM_IMPORT.captures(line) {
        return Some(PythonImport {
            indent: caps["indent"].to_string(),
            module: Some(caps["module"].to_string()),
            names: parse_names(&caps["names"])?,
            comment: caps.name("comment").map(|m| m.as_str().to_string()),
        });
    }
    let caps = PLAIN_IMPORT.captures(line)?;
    Some(PythonImport {
        indent: caps["indent"].to_string(),
        module: None,
        names: parse_names(&caps["names"])?,
        comment: caps.name("comment").map(|m| m.as_str().to_string()),
    })
}

/// File a formatter complained about.
pub fn parse_formatter_target(message: &str) -> Option<String> {
    [&*WOULD_REFORMAT, &*PRETTIER_WARN, &*PATH_TOKEN]
        .into_iter()
        .find_map(|re| re.captures(message))
        .map(|caps| caps["file"].to_string())
}

/// Whether `message` is prettier's `--check` output.
pub fn is_prettier_output(message: &str) -> bool {
    PRETTIER_WARN.is_match(message) || message.to_ascii_lowercase().contains("prettier")
}

/// Top-level module from "No module named 'a.b'".
pub fn parse_missing_python_module(message: &str) -> Option<String> {
    let caps = NO_MODULE_NAMED.captures(message)?;
    caps["module"].split('.').next().map(str::to_string)
}

/// `(name, module)` from "cannot import name 'x' from 'm'".
pub fn parse_cannot_import(message: &str) -> Option<(String, String)> {
    let caps = CANNOT_IMPORT_NAME.captures(message)?;
    Some((caps["name"].to_string(), caps["module"].to_string()))
}

/// npm package from "Cannot find module 'x'" / "Can't resolve 'x'".
///
/// Relative and absolute paths are project files, not packages.
pub fn parse_missing_node_package(message: &str) -> Option<String> {
    let caps = NODE_MISSING_MODULE.captures(message)?;
    let module = &caps["module"];
    if module.starts_with('.') || module.starts_with('/') || module.is_empty() {
        return None;
    }
    let mut segments = module.split('/');
    let first = segments.next()?;
    if first.starts_with('@') {
        let second = segments.next()?;
        Some(format!("{first}/{second}"))
    } else {
        Some(first.to_string())
    }
}

/// Peer requirement `name@range` from an npm warning or ERESOLVE report.
pub fn parse_peer_requirement(message: &str) -> Option<String> {
    if let Some(caps) = PEER_REQUIRES.captures(message) {
        return Some(caps["spec"].to_string());
    }
    let caps = PEER_FROM.captures(message)?;
    Some(format!("{}@{}", &caps["name"], &caps["range"]))
}

/// Where a failure points in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: Option<u32>,
    /// Test id for pytest-style reports.
    pub test: Option<String>,
}

/// Best-effort location of a test/compile failure.
///
/// Tried in order: pytest `FAILED`, the innermost Python traceback frame,
/// tsc `file(l,c): error`, rustc `--> file:l:c`, then `file:line:`.
pub fn parse_failure_location(message: &str) -> Option<SourceLocation> {
    if let Some(caps) = PYTEST_FAILED.captures(message) {
        return Some(SourceLocation {
            file: caps["file"].to_string(),
            line: None,
            test: caps.name("test").map(|m| m.as_str().to_string()),
        });
    }
    if let Some(caps) = PY_TRACEBACK.captures_iter(message).last() {
        return Some(SourceLocation {
            file: caps["file"].to_string(),
            line: caps["line"].parse().ok(),
            test: None,
        });
    }
    [&*TSC_ERROR, &*RUSTC_ARROW, &*GENERIC_LOCATION]
        .into_iter()
        .find_map(|re| re.captures(message))
        .map(|caps| SourceLocation {
            file: caps["file"].to_string(),
            line: caps["line"].parse().ok(),
            test: None,
        })
}

/// Package ecosystem a security finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    Node,
    Python,
    Rust,
}

/// Guess the ecosystem from audit output. Defaults to Node.
pub fn detect_ecosystem(message: &str) -> Ecosystem {
    let lower = message.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    if mentions(&["pip-audit", "safety", "pypi", "requirements.txt", "python", "pip "]) {
        Ecosystem::Python
    } else if mentions(&["cargo", "rustsec", "crates.io", "cargo.lock"]) {
        Ecosystem::Rust
    } else {
        Ecosystem::Node
    }
}
