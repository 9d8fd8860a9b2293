pub mod cache;
pub mod catalog;
pub mod ports;
pub mod registry;
pub mod targets;
pub mod views;

pub use cache::{CacheBank, QuoteCache};
pub use ports::{PriceFeedPort, RpcPort, StrategyStore, UpsertOutcome};
pub use registry::StrategyRegistry;
pub use targets::TargetTracker;
pub use views::{QueryFacade, SortKey};

use std::sync::Arc;

/// Everything the background loops and the read API share: the registry,
/// the quote caches, and the snipe watchlist. Built once at startup and
/// passed by reference — no process-wide singletons.
pub struct StrategyHub {
    pub registry: Arc<StrategyRegistry>,
    pub quotes: Arc<CacheBank>,
    pub targets: Arc<TargetTracker>,
}

impl StrategyHub {
    /// Hub seeded from the literal catalog and launch watchlist.
    pub fn seeded() -> Self {
        let registry = Arc::new(StrategyRegistry::seeded(catalog::seed()));
        tracing::info!("📚 Strategy registry seeded: {} strategies", registry.len());
        Self {
            registry,
            quotes: Arc::new(CacheBank::new()),
            targets: Arc::new(TargetTracker::seeded()),
        }
    }

    /// Empty hub for tests and bespoke wiring.
    pub fn empty() -> Self {
        Self {
            registry: Arc::new(StrategyRegistry::new()),
            quotes: Arc::new(CacheBank::new()),
            targets: Arc::new(TargetTracker::new()),
        }
    }

    pub fn facade(&self) -> QueryFacade {
        QueryFacade::new(Arc::clone(&self.registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_hub_wires_catalog_and_watchlist() {
        let hub = StrategyHub::seeded();
        assert_eq!(hub.registry.len(), 6);
        assert!(!hub.targets.is_empty());
        assert!(hub.quotes.hot().is_empty());

        let summary = hub.facade().summary();
        assert_eq!(summary.total_strategies, 6);
        assert_eq!(summary.deployed, 0);
    }
}
