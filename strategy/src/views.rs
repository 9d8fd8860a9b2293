use crate::registry::StrategyRegistry;
use serde::{Deserialize, Serialize};
use sim_core::{StrategyRecord, StrategySummary};
use std::str::FromStr;
use std::sync::Arc;

/// Numeric field a ranked query sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    ScalingMultiplier,
    WinRate,
    ProfitVelocity,
    TargetSol,
}

impl SortKey {
    fn value_of(&self, record: &StrategyRecord) -> f64 {
        match self {
            SortKey::ScalingMultiplier => record.scaling_multiplier,
            SortKey::WinRate => record.win_rate,
            SortKey::ProfitVelocity => record.profit_velocity,
            SortKey::TargetSol => record.target_sol,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scaling_multiplier" | "multiplier" => Ok(SortKey::ScalingMultiplier),
            "win_rate" => Ok(SortKey::WinRate),
            "profit_velocity" | "velocity" => Ok(SortKey::ProfitVelocity),
            "target_sol" | "target" => Ok(SortKey::TargetSol),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Read-only derived views over the registry. No side effects; empty
/// results come back as empty lists and zeroed summaries, never errors.
pub struct QueryFacade {
    registry: Arc<StrategyRegistry>,
}

impl QueryFacade {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self { registry }
    }

    /// Filter, sort descending on `key`, truncate to `n`.
    pub fn top_n<F>(&self, n: usize, key: SortKey, filter: F) -> Vec<StrategyRecord>
    where
        F: Fn(&StrategyRecord) -> bool,
    {
        let mut records: Vec<StrategyRecord> =
            self.registry.list().into_iter().filter(|r| filter(r)).collect();
        records.sort_by(|a, b| {
            key.value_of(b)
                .partial_cmp(&key.value_of(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records.truncate(n);
        records
    }

    pub fn deployed(&self) -> Vec<StrategyRecord> {
        self.registry
            .list()
            .into_iter()
            .filter(|r| r.is_deployed)
            .collect()
    }

    /// Dashboard aggregates across the full registry.
    pub fn summary(&self) -> StrategySummary {
        let records = self.registry.list();
        if records.is_empty() {
            return StrategySummary::default();
        }

        let total_entry_cost = records.iter().map(|r| r.entry_sol).sum();
        let total_projected_target = records.iter().map(|r| r.target_sol).sum();
        let avg_win_rate =
            records.iter().map(|r| r.win_rate).sum::<f64>() / records.len() as f64;
        let deployed = records.iter().filter(|r| r.is_deployed).count();

        StrategySummary {
            total_strategies: records.len(),
            total_entry_cost,
            total_projected_target,
            avg_win_rate,
            deployed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{PerformanceProfile, RiskTier};

    fn record(id: &str, entry: f64, multiplier: f64) -> StrategyRecord {
        StrategyRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            entry_sol: entry,
            target_sol: entry * multiplier,
            scaling_multiplier: multiplier,
            win_rate: 0.9,
            profit_velocity: 10.0,
            special_features: vec![],
            risk: RiskTier::new(RiskTier::MEDIUM),
            phases: vec![],
            performance: PerformanceProfile::default(),
            is_deployed: false,
            deployed_at: None,
            metadata: Default::default(),
        }
    }

    fn facade_with_multipliers(multipliers: &[f64]) -> QueryFacade {
        let registry = Arc::new(StrategyRegistry::new());
        for (i, m) in multipliers.iter().enumerate() {
            registry.register(record(&format!("s{i}"), 0.1, *m));
        }
        QueryFacade::new(registry)
    }

    #[test]
    fn top_n_sorts_descending_and_truncates() {
        let facade = facade_with_multipliers(&[10.0, 50.0, 5.0, 100.0, 1.0]);

        let top = facade.top_n(3, SortKey::ScalingMultiplier, |_| true);
        let values: Vec<f64> = top.iter().map(|r| r.scaling_multiplier).collect();
        assert_eq!(values, vec![100.0, 50.0, 10.0]);
    }

    #[test]
    fn top_n_applies_filter_before_ranking() {
        let facade = facade_with_multipliers(&[10.0, 50.0, 5.0, 100.0, 1.0]);

        let top = facade.top_n(3, SortKey::ScalingMultiplier, |r| r.scaling_multiplier < 50.0);
        let values: Vec<f64> = top.iter().map(|r| r.scaling_multiplier).collect();
        assert_eq!(values, vec![10.0, 5.0, 1.0]);
    }

    #[test]
    fn top_n_on_empty_registry_is_empty() {
        let facade = QueryFacade::new(Arc::new(StrategyRegistry::new()));
        assert!(facade.top_n(5, SortKey::WinRate, |_| true).is_empty());
    }

    #[test]
    fn summary_totals_entry_cost() {
        let registry = Arc::new(StrategyRegistry::new());
        for (i, entry) in [0.05, 0.1, 0.2].iter().enumerate() {
            registry.register(record(&format!("s{i}"), *entry, 10.0));
        }
        let facade = QueryFacade::new(registry);

        let summary = facade.summary();
        assert_eq!(summary.total_strategies, 3);
        assert!((summary.total_entry_cost - 0.35).abs() < 1e-9);
        assert!((summary.avg_win_rate - 0.9).abs() < 1e-9);
        assert_eq!(summary.deployed, 0);
    }

    #[test]
    fn deployed_view_filters_on_the_flag() {
        let registry = Arc::new(StrategyRegistry::new());
        registry.register(record("a", 0.1, 10.0));
        registry.register(record("b", 0.1, 20.0));
        registry.update("b", |r| r.is_deployed = true);
        let facade = QueryFacade::new(Arc::clone(&registry));

        let deployed = facade.deployed();
        assert_eq!(deployed.len(), 1);
        assert_eq!(deployed[0].id, "b");
        assert_eq!(facade.summary().deployed, 1);
    }

    #[test]
    fn summary_of_empty_registry_is_zeroed() {
        let facade = QueryFacade::new(Arc::new(StrategyRegistry::new()));
        let summary = facade.summary();
        assert_eq!(summary.total_strategies, 0);
        assert_eq!(summary.total_entry_cost, 0.0);
        assert_eq!(summary.avg_win_rate, 0.0);
    }

    #[test]
    fn sort_key_parses_from_query_strings() {
        assert_eq!("win_rate".parse::<SortKey>().unwrap(), SortKey::WinRate);
        assert_eq!(
            "multiplier".parse::<SortKey>().unwrap(),
            SortKey::ScalingMultiplier
        );
        assert!("sharpness".parse::<SortKey>().is_err());
    }
}
