use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for Mender
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Fix-generation engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Error-kind tag handling
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Maximum strategies running at once (1 = single synchronous pass)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Candidates below this confidence are flagged for human review
    #[serde(default = "default_review_threshold")]
    pub review_threshold: f64,

    /// Python requirements file that dependency fixes append to
    #[serde(default = "default_requirements_file")]
    pub requirements_file: String,

    /// Directory that file paths in diagnostics are relative to
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
}

const fn default_max_concurrency() -> usize {
    4
}

const fn default_review_threshold() -> f64 {
    0.7
}

fn default_requirements_file() -> String {
    "requirements.txt".to_string()
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            review_threshold: default_review_threshold(),
            requirements_file: default_requirements_file(),
            source_root: default_source_root(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutputConfig {
    /// Where the JSON report is written
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Pretty-print the JSON report
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_report_path() -> PathBuf {
    PathBuf::from(".mender/fix-report.json")
}

const fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            pretty: default_pretty(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Taxonomy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TaxonomyConfig {
    /// Producer-specific tag -> canonical error-kind tag
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}
