//! Domain layer for the Mender triage engine
//!
//! This module contains the input/output models, the error taxonomy and the
//! port traits strategies and adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult, StrategyError, StrategyResult};
