//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing-subscriber)
//! - Source tree readers implementing the `SourceReader` port

pub mod config;
pub mod logging;
pub mod source;
