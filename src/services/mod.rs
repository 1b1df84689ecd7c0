//! Service layer: the triage stages and the pipeline that runs them.

pub mod consolidator;
pub mod diagnostics;
pub mod dispatcher;
pub mod pipeline;
pub mod prioritizer;
pub mod report;
pub mod strategies;
pub mod taxonomy;

pub use consolidator::consolidate;
pub use dispatcher::Dispatcher;
pub use pipeline::{read_analysis, TriagePipeline};
pub use prioritizer::prioritize;
pub use report::{aggregate_confidence, assemble};
pub use strategies::StrategyRegistry;
pub use taxonomy::{priority_of, strategy_for, Taxonomy};
