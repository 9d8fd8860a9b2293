//! Literal strategy table seeded into the registry at startup.
//!
//! Numbers come straight from the product sheet; they are not derived from
//! each other (a few scaling multipliers disagree with target/entry and are
//! kept that way).

use sim_core::{PerformanceProfile, PhaseRecord, RiskTier, StrategyRecord};

fn phase(
    id: &str,
    name: &str,
    duration: &str,
    multiplier: f64,
    techniques: &[&str],
    risk: &str,
) -> PhaseRecord {
    PhaseRecord {
        id: id.to_string(),
        name: name.to_string(),
        duration_range: duration.to_string(),
        multiplier,
        techniques: techniques.iter().map(|t| t.to_string()).collect(),
        risk: RiskTier::new(risk),
    }
}

#[allow(clippy::too_many_arguments)]
fn strategy(
    id: &str,
    name: &str,
    entry_sol: f64,
    target_sol: f64,
    scaling_multiplier: f64,
    win_rate: f64,
    profit_velocity: f64,
    features: &[&str],
    risk: &str,
    phases: Vec<PhaseRecord>,
    performance: PerformanceProfile,
) -> StrategyRecord {
    StrategyRecord {
        id: id.to_string(),
        name: name.to_string(),
        entry_sol,
        target_sol,
        scaling_multiplier,
        win_rate,
        profit_velocity,
        special_features: features.iter().map(|f| f.to_string()).collect(),
        risk: RiskTier::new(risk),
        phases,
        performance,
        is_deployed: false,
        deployed_at: None,
        metadata: Default::default(),
    }
}

/// The six launch strategies.
pub fn seed() -> Vec<StrategyRecord> {
    vec![
        strategy(
            "velocity-scalper",
            "Velocity Scalper",
            0.5,
            250.0,
            500.0,
            0.847,
            120.0,
            &[
                "Micro-arbitrage burst entries",
                "Per-cycle compounding",
                "Cross-DEX spread capture",
            ],
            RiskTier::EXTREME,
            vec![
                phase(
                    "velocity_burst",
                    "Micro Burst Entry",
                    "1-10 minutes",
                    25.0,
                    &["Micro-burst order slicing", "Spread sweep across majors"],
                    RiskTier::INSTANT,
                ),
                phase(
                    "velocity_amp",
                    "Velocity Amplification",
                    "20-60 minutes",
                    10.0,
                    &["Rolling position compounding", "Momentum-weighted sizing"],
                    RiskTier::EXTREME,
                ),
                phase(
                    "velocity_lockin",
                    "Profit Lock-in",
                    "10-50 minutes",
                    2.0,
                    &["Laddered exits", "Stable pair rotation"],
                    RiskTier::HIGH,
                ),
            ],
            PerformanceProfile {
                avg_completion_hours: 1.25,
                max_multiplier: 500.0,
                win_rate: 0.847,
                profit_velocity: 120.0,
            },
        ),
        strategy(
            "flash-cascade",
            "Flash Loan Cascade",
            1.0,
            900.0,
            900.0,
            0.891,
            150.0,
            &[
                "Recursive flash loan levels",
                "Profit reinvestment per cycle",
                "Multi-pool convergence routing",
            ],
            RiskTier::EXTREME,
            vec![
                phase(
                    "cascade_seed",
                    "Cascade Seeding",
                    "2-15 minutes",
                    30.0,
                    &["Initial loan stacking", "Route warm-up"],
                    RiskTier::INSTANT,
                ),
                phase(
                    "cascade_convergence",
                    "Cascade Convergence",
                    "30-90 minutes",
                    15.0,
                    &["Triangular route merging", "Level-by-level reinvestment"],
                    RiskTier::EXTREME,
                ),
                phase(
                    "cascade_unwind",
                    "Cascade Unwind",
                    "30-90 minutes",
                    2.0,
                    &["Loan repayment sequencing", "Residual sweep"],
                    RiskTier::LEGENDARY,
                ),
            ],
            PerformanceProfile {
                avg_completion_hours: 2.0,
                max_multiplier: 1800.0,
                win_rate: 0.891,
                profit_velocity: 150.0,
            },
        ),
        strategy(
            "momentum-surge",
            "Momentum Surge Rider",
            0.08,
            200.0,
            2500.0,
            0.923,
            57.0,
            &[
                "Launch momentum detection",
                "Surge window riding",
                "Volatility-scaled exits",
            ],
            RiskTier::LEGENDARY,
            vec![
                phase(
                    "surge_entry",
                    "Surge Entry",
                    "10-30 minutes",
                    625.0,
                    &["Early launch entry", "Liquidity depth screening"],
                    RiskTier::INSTANT,
                ),
                phase(
                    "surge_ride",
                    "Surge Ride",
                    "1-2 hours",
                    400.0,
                    &["Momentum tracking", "Trailing stop ladder"],
                    RiskTier::EXTREME,
                ),
                phase(
                    "surge_exit",
                    "Surge Exit",
                    "1-3 hours",
                    10.0,
                    &["Volatility-scaled unwinding", "Stable rotation"],
                    RiskTier::LEGENDARY,
                ),
            ],
            PerformanceProfile {
                avg_completion_hours: 3.5,
                max_multiplier: 250000.0,
                win_rate: 0.923,
                profit_velocity: 57.0,
            },
        ),
        strategy(
            "stake-loop",
            "Stake Yield Loop",
            0.12,
            150.0,
            1250.0,
            0.967,
            30.0,
            &[
                "Liquid staking compounding",
                "Validator tip capture",
                "Yield-to-principal recycling",
            ],
            RiskTier::LOW,
            vec![
                phase(
                    "loop_stake",
                    "Initial Stake",
                    "15-45 minutes",
                    250.0,
                    &["Liquid stake entry", "Tip stream subscription"],
                    RiskTier::LOW,
                ),
                phase(
                    "loop_compound",
                    "Compound Cycle",
                    "1-3 hours",
                    333.3,
                    &["Reward harvesting", "Auto-restake"],
                    RiskTier::MEDIUM,
                ),
                phase(
                    "loop_harvest",
                    "Final Harvest",
                    "2-4 hours",
                    15.0,
                    &["Position unwind", "Yield consolidation"],
                    RiskTier::LOW,
                ),
            ],
            PerformanceProfile {
                avg_completion_hours: 5.0,
                max_multiplier: 3200.0,
                win_rate: 0.967,
                profit_velocity: 30.0,
            },
        ),
        strategy(
            "sniper-relay",
            "Launch Sniper Relay",
            0.05,
            500.0,
            // Sheet figure; does not match target/entry and is kept as-is.
            12500.0,
            0.78,
            400.0,
            &[
                "New pool detection relay",
                "Sub-second entry placement",
                "Rug filter pre-screen",
            ],
            RiskTier::NUCLEAR,
            vec![
                phase(
                    "relay_detect",
                    "Detection Window",
                    "1-10 minutes",
                    4000.0,
                    &["Pool creation sniffing", "Mint authority screening"],
                    RiskTier::INSTANT,
                ),
                phase(
                    "relay_strike",
                    "Relay Strike",
                    "20-60 minutes",
                    250.0,
                    &["Priority-fee escalation", "Bundled entry"],
                    RiskTier::NUCLEAR,
                ),
                phase(
                    "relay_secure",
                    "Position Securing",
                    "10-50 minutes",
                    10.0,
                    &["Partial exit laddering", "Profit custody split"],
                    RiskTier::LEGENDARY,
                ),
            ],
            PerformanceProfile {
                avg_completion_hours: 1.25,
                max_multiplier: 1000000.0,
                win_rate: 0.78,
                profit_velocity: 400.0,
            },
        ),
        strategy(
            "micro-grid",
            "Micro Grid Accumulator",
            0.1,
            15.0,
            150.0,
            0.95,
            5.0,
            &[
                "Micro-transaction grid",
                "Zero-capital position building",
                "Daily goal compounding",
            ],
            RiskTier::MEDIUM,
            vec![
                phase(
                    "grid_build",
                    "Grid Build-out",
                    "30-60 minutes",
                    15.0,
                    &["Grid level placement", "Micro-fill accumulation"],
                    RiskTier::LOW,
                ),
                phase(
                    "grid_rotate",
                    "Grid Rotation",
                    "1-2 hours",
                    5.0,
                    &["Level re-centering", "Fill-rate balancing"],
                    RiskTier::MEDIUM,
                ),
                phase(
                    "grid_close",
                    "Grid Close-out",
                    "30-90 minutes",
                    2.0,
                    &["Inventory flattening", "Fee reconciliation"],
                    RiskTier::MEDIUM,
                ),
            ],
            PerformanceProfile {
                avg_completion_hours: 3.0,
                max_multiplier: 150.0,
                win_rate: 0.95,
                profit_velocity: 5.0,
            },
        ),
    ]
}
