use dashmap::DashMap;
use parking_lot::RwLock;
use sim_core::{PerformanceProfile, PhaseRecord, RiskTier, StrategyRecord};

/// In-memory strategy catalog, keyed by id with a name index for the
/// persistence upsert path.
///
/// Single writer role: only the performance drift loop mutates numeric
/// fields after seeding. Reads come from any number of tasks, hence the
/// concurrent map instead of a plain HashMap.
///
/// Records are stored exactly as given: no numeric validation happens here
/// (a record with `target_sol < entry_sol` is accepted and round-trips).
pub struct StrategyRegistry {
    records: DashMap<String, StrategyRecord>,
    by_name: DashMap<String, String>,
    // Insertion order for list(); nothing sorts on it, but deploy sync and
    // the API walk strategies in a stable order.
    order: RwLock<Vec<String>>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            by_name: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Build a registry pre-populated from a literal table.
    pub fn seeded(records: Vec<StrategyRecord>) -> Self {
        let registry = Self::new();
        for record in records {
            registry.register(record);
        }
        registry
    }

    /// Insert or replace by id. Replacement keeps the original insertion
    /// slot; a fresh id is appended.
    pub fn register(&self, record: StrategyRecord) {
        let id = record.id.clone();
        self.by_name.insert(record.name.clone(), id.clone());
        if self.records.insert(id.clone(), record).is_none() {
            self.order.write().push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<StrategyRecord> {
        self.records.get(id).map(|r| r.value().clone())
    }

    pub fn get_by_name(&self, name: &str) -> Option<StrategyRecord> {
        let id = self.by_name.get(name)?.value().clone();
        self.get(&id)
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<StrategyRecord> {
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| self.records.get(id).map(|r| r.value().clone()))
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.order.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mutate a record in place. Returns false when the id is unknown.
    /// Used by the drift loop and the deploy flag update.
    pub fn update<F: FnOnce(&mut StrategyRecord)>(&self, id: &str, mutate: F) -> bool {
        match self.records.get_mut(id) {
            Some(mut entry) => {
                mutate(entry.value_mut());
                true
            }
            None => false,
        }
    }

    /// Remove a record entirely. Catalog strategies stay for the process
    /// lifetime; this exists for operator-created customs.
    pub fn remove(&self, id: &str) -> Option<StrategyRecord> {
        let (_, record) = self.records.remove(id)?;
        self.by_name.remove(&record.name);
        self.order.write().retain(|existing| existing != id);
        Some(record)
    }

    /// Append an operator-defined strategy with generator-default
    /// parameters. Free-form name, single warm-up phase.
    pub fn create_custom(&self, name: &str, risk: RiskTier) -> StrategyRecord {
        let id = name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        let record = StrategyRecord {
            id: id.clone(),
            name: name.trim().to_string(),
            entry_sol: 0.1,
            target_sol: 10.0,
            scaling_multiplier: 100.0,
            win_rate: 0.8,
            profit_velocity: 5.0,
            special_features: vec!["Operator-defined custom strategy".to_string()],
            risk: risk.clone(),
            phases: vec![PhaseRecord {
                id: format!("{id}_warmup"),
                name: "Warm-up Accumulation".to_string(),
                duration_range: "10-30 minutes".to_string(),
                multiplier: 100.0,
                techniques: vec!["Incremental position building".to_string()],
                risk,
            }],
            performance: PerformanceProfile {
                avg_completion_hours: 1.0,
                max_multiplier: 100.0,
                win_rate: 0.8,
                profit_velocity: 5.0,
            },
            is_deployed: false,
            deployed_at: None,
            metadata: Default::default(),
        };
        tracing::info!("🛠️ Custom strategy registered: {} ({})", record.name, record.id);
        self.register(record.clone());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn bare(id: &str, name: &str, entry: f64, target: f64) -> StrategyRecord {
        StrategyRecord {
            id: id.to_string(),
            name: name.to_string(),
            entry_sol: entry,
            target_sol: target,
            scaling_multiplier: target / entry,
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

    #[test]
    fn register_is_idempotent_by_id() {
        let registry = StrategyRegistry::new();
        registry.register(bare("alpha", "Alpha", 1.0, 10.0));
        registry.register(bare("alpha", "Alpha", 2.0, 10.0));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("alpha").unwrap().entry_sol, 2.0);
        assert_eq!(registry.ids(), vec!["alpha".to_string()]);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let registry = StrategyRegistry::new();
        registry.register(bare("c", "C", 1.0, 2.0));
        registry.register(bare("a", "A", 1.0, 2.0));
        registry.register(bare("b", "B", 1.0, 2.0));

        let ids: Vec<String> = registry.list().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn no_numeric_validation_on_register() {
        // target below entry and an inconsistent multiplier are stored as-is
        let registry = StrategyRegistry::new();
        let mut record = bare("weird", "Weird", 5.0, 1.0);
        record.scaling_multiplier = 999.0;
        registry.register(record);

        let stored = registry.get("weird").unwrap();
        assert_eq!(stored.entry_sol, 5.0);
        assert_eq!(stored.target_sol, 1.0);
        assert_eq!(stored.scaling_multiplier, 999.0);
    }

    #[test]
    fn lookup_by_name_follows_replacement() {
        let registry = StrategyRegistry::new();
        registry.register(bare("alpha", "Alpha", 1.0, 10.0));
        assert!(registry.get_by_name("Alpha").is_some());
        assert!(registry.get_by_name("Beta").is_none());
    }

    #[test]
    fn remove_clears_all_indexes() {
        let registry = StrategyRegistry::new();
        registry.register(bare("alpha", "Alpha", 1.0, 10.0));
        registry.register(bare("beta", "Beta", 1.0, 10.0));

        let removed = registry.remove("alpha").unwrap();
        assert_eq!(removed.id, "alpha");
        assert!(registry.get("alpha").is_none());
        assert!(registry.get_by_name("Alpha").is_none());
        assert_eq!(registry.ids(), vec!["beta".to_string()]);
        assert!(registry.remove("alpha").is_none());
    }

    #[test]
    fn create_custom_appends_with_defaults() {
        let registry = StrategyRegistry::seeded(catalog::seed());
        let before = registry.len();

        let custom = registry.create_custom("  Night Shift Scalper ", RiskTier::new(RiskTier::HIGH));
        assert_eq!(custom.id, "night-shift-scalper");
        assert_eq!(registry.len(), before + 1);

        let stored = registry.get("night-shift-scalper").unwrap();
        assert_eq!(stored.name, "Night Shift Scalper");
        assert_eq!(stored.phases.len(), 1);
        assert!(!stored.is_deployed);
    }

    #[test]
    fn update_mutates_in_place() {
        let registry = StrategyRegistry::new();
        registry.register(bare("alpha", "Alpha", 1.0, 10.0));

        assert!(registry.update("alpha", |r| r.win_rate = 0.5));
        assert_eq!(registry.get("alpha").unwrap().win_rate, 0.5);
        assert!(!registry.update("ghost", |r| r.win_rate = 0.0));
    }
}
