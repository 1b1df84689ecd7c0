//! Fix strategies and the registry that maps error kinds to them.
//!
//! The registry is built once at startup and is read-only afterwards.
//! Lookup is total: any kind without a registered strategy falls back to
//! [`ManualReviewStrategy`].

pub mod dependency;
pub mod format;
pub mod lint;
pub mod packages;
pub mod review;
pub mod runtime;
pub mod security;

use std::collections::HashMap;
use std::sync::Arc;

pub use dependency::{DependencyStrategy, PeerDependencyStrategy};
pub use format::FormatterStrategy;
pub use lint::{LintStyleStrategy, UnusedImportStrategy};
pub use review::{FailureReviewStrategy, ManualReviewStrategy};
pub use runtime::RuntimeStrategy;
pub use security::SecurityAuditStrategy;

use crate::domain::models::ErrorKind;
use crate::domain::ports::{FixStrategy, StrategyId};
use crate::services::taxonomy;

/// Strategy implementations keyed by [`StrategyId`].
pub struct StrategyRegistry {
    strategies: HashMap<StrategyId, Arc<dyn FixStrategy>>,
    fallback: Arc<dyn FixStrategy>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.strategies.keys().collect();
        ids.sort();
        f.debug_struct("StrategyRegistry")
            .field("strategies", &ids)
            .field("fallback", &self.fallback.id())
            .finish()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl StrategyRegistry {
    /// Registry with no strategies; every lookup hits the fallback.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: Arc::new(ManualReviewStrategy),
        }
    }

    /// Registry with every built-in strategy.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(LintStyleStrategy));
        registry.register(Arc::new(UnusedImportStrategy));
        registry.register(Arc::new(FormatterStrategy));
        registry.register(Arc::new(RuntimeStrategy));
        registry.register(Arc::new(DependencyStrategy));
        registry.register(Arc::new(PeerDependencyStrategy));
        registry.register(Arc::new(FailureReviewStrategy));
        registry.register(Arc::new(SecurityAuditStrategy));
        registry.register(Arc::new(ManualReviewStrategy));
        registry
    }

    /// Add or replace the strategy for its id.
    pub fn register(&mut self, strategy: Arc<dyn FixStrategy>) {
        self.strategies.insert(strategy.id(), strategy);
    }

    /// Strategy registered under `id`, if any.
    pub fn get(&self, id: StrategyId) -> Option<&dyn FixStrategy> {
        self.strategies.get(&id).map(|s| s.as_ref())
    }

    /// Strategy responsible for `kind`. Never fails.
    pub fn strategy_for_kind(&self, kind: &ErrorKind) -> &dyn FixStrategy {
        self.get(taxonomy::strategy_for(kind))
            .unwrap_or_else(|| self.fallback.as_ref())
    }

    /// Registered ids in order.
    pub fn ids(&self) -> Vec<StrategyId> {
        let mut ids: Vec<_> = self.strategies.keys().copied().collect();
        ids.sort();
        ids
    }
}
