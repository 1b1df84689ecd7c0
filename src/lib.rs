//! Mender - CI failure triage and fix proposals
//!
//! Mender reads a structured failure analysis (jobs and the errors each one
//! produced), ranks the errors by an explicit taxonomy, asks a fix strategy
//! for a candidate per error, groups candidates that touch the same target
//! and writes a single JSON fix report.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): input/output models, the error taxonomy and port traits
//! - **Service Layer** (`services`): prioritizer, strategies, dispatcher, consolidator, report
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and source readers
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mender::{Config, TriagePipeline};
//! use mender::infrastructure::source::FsSourceReader;
//!
//! let pipeline = TriagePipeline::from_config(&Config::default(), Arc::new(FsSourceReader::new(".")));
//! let report = pipeline.run_json(r#"{"failedJobs": []}"#);
//! assert!(report.ok);
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, ConsolidatedFix, ErrorKind, ErrorRecord, FailureAnalysis, FixCandidate, FixReport,
    Job, LineEdit, LoggingConfig, Patch,
};
pub use domain::ports::{FixStrategy, NullSourceReader, SourceReader, StrategyContext, StrategyId};
pub use domain::{DomainError, StrategyError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{StrategyRegistry, Taxonomy, TriagePipeline};
