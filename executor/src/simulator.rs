use crate::rng::PerturbationSource;
use sim_core::{math, ExecutionReport, TraceEntry};
use smallvec::SmallVec;
use std::sync::Arc;
use strategy::StrategyRegistry;
use thiserror::Error;

/// Fraction of target the final balance must reach for a run to count as a
/// hit, and the default variance band applied to each phase multiplier.
pub const HIT_TARGET_FRACTION: f64 = 0.8;
pub const DEFAULT_VARIANCE: f64 = 0.3;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("strategy {0} not found")]
    StrategyNotFound(String),
}

/// Runs a strategy's phase sequence against a running balance.
///
/// Phase progression is a plain ordered loop — every phase always runs, in
/// record order, with no gating between them. `StrategyNotFound` is the one
/// error that propagates to callers; it never leaves partial state behind
/// (the simulator reads the registry, it does not write it).
pub struct ExecutionSimulator {
    registry: Arc<StrategyRegistry>,
    variance: f64,
}

impl ExecutionSimulator {
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self::with_variance(registry, DEFAULT_VARIANCE)
    }

    /// `variance` is the half-width of the per-phase multiplier band;
    /// 0.0 makes runs fully deterministic.
    pub fn with_variance(registry: Arc<StrategyRegistry>, variance: f64) -> Self {
        Self { registry, variance }
    }

    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn execute(
        &self,
        strategy_id: &str,
        source: &mut dyn PerturbationSource,
    ) -> Result<ExecutionReport, ExecutionError> {
        let record = self
            .registry
            .get(strategy_id)
            .ok_or_else(|| ExecutionError::StrategyNotFound(strategy_id.to_string()))?;

        let mut balance = record.entry_sol;
        let mut trace: SmallVec<[TraceEntry; 4]> = SmallVec::new();

        for phase in &record.phases {
            let factor = if self.variance == 0.0 {
                1.0
            } else {
                math::variance_factor(source.unit(), self.variance)
            };
            let applied = phase.multiplier * factor;
            let end = balance * applied;

            trace.push(TraceEntry {
                phase: phase.name.clone(),
                start_sol: balance,
                end_sol: end,
                multiplier: applied,
                techniques: phase.techniques.clone(),
            });

            tracing::debug!(
                "⚙️ [{}] {} x{:.2}: {:.4} -> {:.4} SOL",
                record.id,
                phase.name,
                applied,
                balance,
                end
            );
            balance = end;
        }

        let total_multiplier = if record.entry_sol > 0.0 {
            balance / record.entry_sol
        } else {
            0.0
        };
        let hit_target = balance >= record.target_sol * HIT_TARGET_FRACTION;

        tracing::info!(
            "🏁 Executed {}: {:.4} -> {:.4} SOL ({:.1}x, target {})",
            record.name,
            record.entry_sol,
            balance,
            total_multiplier,
            if hit_target { "hit" } else { "missed" }
        );

        Ok(ExecutionReport {
            strategy_id: record.id,
            strategy_name: record.name,
            entry_sol: record.entry_sol,
            final_sol: balance,
            total_multiplier,
            hit_target,
            trace: trace.to_vec(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rng::{Midpoint, SeededSource};
    use sim_core::{PerformanceProfile, PhaseRecord, RiskTier, StrategyRecord};

    pub(crate) fn two_phase_strategy() -> StrategyRecord {
        StrategyRecord {
            id: "double-triple".to_string(),
            name: "Double Triple".to_string(),
            entry_sol: 1.0,
            target_sol: 6.0,
            scaling_multiplier: 6.0,
            win_rate: 0.9,
            profit_velocity: 3.0,
            special_features: vec![],
            risk: RiskTier::new(RiskTier::MEDIUM),
            phases: vec![
                PhaseRecord {
                    id: "p1".to_string(),
                    name: "Doubling".to_string(),
                    duration_range: "1-5 minutes".to_string(),
                    multiplier: 2.0,
                    techniques: vec!["doubling".to_string()],
                    risk: RiskTier::new(RiskTier::LOW),
                },
                PhaseRecord {
                    id: "p2".to_string(),
                    name: "Tripling".to_string(),
                    duration_range: "1-5 minutes".to_string(),
                    multiplier: 3.0,
                    techniques: vec!["tripling".to_string()],
                    risk: RiskTier::new(RiskTier::LOW),
                },
            ],
            performance: PerformanceProfile::default(),
            is_deployed: false,
            deployed_at: None,
            metadata: Default::default(),
        }
    }

    #[test]
    fn unknown_id_fails_without_touching_the_registry() {
        let registry = Arc::new(StrategyRegistry::new());
        registry.register(two_phase_strategy());
        let simulator = ExecutionSimulator::new(Arc::clone(&registry));

        let err = simulator
            .execute("nonexistent-id", &mut Midpoint)
            .unwrap_err();
        assert!(matches!(err, ExecutionError::StrategyNotFound(ref id) if id == "nonexistent-id"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("double-triple").unwrap().win_rate, 0.9);
    }

    #[test]
    fn midpoint_source_pins_phase_arithmetic() {
        let registry = Arc::new(StrategyRegistry::new());
        registry.register(two_phase_strategy());
        let simulator = ExecutionSimulator::new(registry);

        let report = simulator.execute("double-triple", &mut Midpoint).unwrap();
        assert!((report.final_sol - 6.0).abs() < 1e-12);
        assert!((report.total_multiplier - 6.0).abs() < 1e-12);
        assert_eq!(report.trace.len(), 2);
        assert_eq!(report.trace[0].phase, "Doubling");
        assert_eq!(report.trace[1].phase, "Tripling");
        assert_eq!(report.trace[0].end_sol, report.trace[1].start_sol);
        assert!(report.hit_target);
    }

    #[test]
    fn variance_keeps_outcomes_inside_the_band() {
        let registry = Arc::new(StrategyRegistry::new());
        registry.register(two_phase_strategy());
        let simulator = ExecutionSimulator::new(registry);
        let mut source = SeededSource::new(1234);

        for _ in 0..50 {
            let report = simulator.execute("double-triple", &mut source).unwrap();
            // each phase factor lies in [0.7, 1.3], so the product is bounded
            assert!(report.final_sol >= 6.0 * 0.7 * 0.7 - 1e-9);
            assert!(report.final_sol <= 6.0 * 1.3 * 1.3 + 1e-9);
        }
    }

    #[test]
    fn zero_variance_ignores_the_source_entirely() {
        let registry = Arc::new(StrategyRegistry::new());
        registry.register(two_phase_strategy());
        let simulator = ExecutionSimulator::with_variance(registry, 0.0);
        let mut source = SeededSource::new(99);

        let report = simulator.execute("double-triple", &mut source).unwrap();
        assert_eq!(report.final_sol, 6.0);
    }
}
