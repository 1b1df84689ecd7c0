//! Port trait definitions (Hexagonal Architecture)
//!
//! - FixStrategy: proposes a fix for one error
//! - SourceReader: read-only access to files named by diagnostics
//!
//! Strategies depend only on these traits, never on the filesystem directly.

pub mod fix_strategy;
pub mod null_source;
pub mod source_reader;

pub use fix_strategy::{FixStrategy, StrategyContext, StrategyId, StrategySettings};
pub use null_source::NullSourceReader;
pub use source_reader::SourceReader;
