//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - pretty or JSON formatting on stderr
//! - optional daily-rolling JSON log files
//! - `RUST_LOG` overrides the configured level

pub mod config;
pub mod logger;

pub use config::LogFormat;
pub use logger::LoggerImpl;
