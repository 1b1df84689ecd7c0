//! Domain models for the triage engine.

pub mod analysis;
pub mod config;
pub mod error_kind;
pub mod fix;
pub mod report;

pub use analysis::{ErrorRecord, FailureAnalysis, Job};
pub use config::{Config, EngineConfig, LoggingConfig, OutputConfig, TaxonomyConfig};
pub use error_kind::ErrorKind;
pub use fix::{clamp_confidence, FixCandidate, LineEdit, Patch};
pub use report::{ConsolidatedFix, FixReport};
