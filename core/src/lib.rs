pub mod math;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk classification tag for strategies and phases.
///
/// The catalog uses a small set of well-known tags, but operators can attach
/// custom tags to hand-built strategies, so this is an open string rather
/// than a closed enum. Unknown tags round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskTier(String);

impl RiskTier {
    pub const INSTANT: &'static str = "instant";
    pub const EXTREME: &'static str = "extreme";
    pub const LEGENDARY: &'static str = "legendary";
    pub const LOW: &'static str = "low";
    pub const MEDIUM: &'static str = "medium";
    pub const HIGH: &'static str = "high";
    pub const NUCLEAR: &'static str = "nuclear";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RiskTier {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of a strategy's fixed execution sequence.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PhaseRecord {
    pub id: String,
    pub name: String,
    /// Free text ("5-20 minutes"), never machine-parsed.
    pub duration_range: String,
    pub multiplier: f64,
    pub techniques: Vec<String>,
    pub risk: RiskTier,
}

/// Aggregate performance figures carried alongside a strategy.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PerformanceProfile {
    pub avg_completion_hours: f64,
    pub max_multiplier: f64,
    pub win_rate: f64,
    pub profit_velocity: f64,
}

/// A named bundle of trading parameters plus an ordered phase sequence.
/// The unit of storage in the registry; seeded from the literal catalog at
/// startup and drifted in place by the background performance loop.
///
/// Numeric fields are independently settable: nothing enforces
/// `target_sol > entry_sol` or `scaling_multiplier == target_sol / entry_sol`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StrategyRecord {
    pub id: String,
    /// Unique; the upsert key for persistence.
    pub name: String,
    pub entry_sol: f64,
    pub target_sol: f64,
    pub scaling_multiplier: f64,
    pub win_rate: f64,
    /// SOL per hour.
    pub profit_velocity: f64,
    pub special_features: Vec<String>,
    pub risk: RiskTier,
    pub phases: Vec<PhaseRecord>,
    pub performance: PerformanceProfile,
    pub is_deployed: bool,
    pub deployed_at: Option<DateTime<Utc>>,
    /// Free-form, per-strategy-varying extras. Known shapes (phases,
    /// performance) are typed above; only genuinely loose content lands here.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A derived, timestamped read of a token's simulated value.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuoteEntry {
    pub key: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    /// 0..=100.
    pub confidence: f64,
}

/// A launch-sniping watchlist entry. The only record type in the system
/// that is ever deleted (claimed when the target is sniped).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SnipeTarget {
    pub mint: String,
    pub symbol: String,
    pub momentum: f64,
    pub volatility: f64,
    pub added_at: DateTime<Utc>,
}

/// One phase step of an execution run. Append-only, scoped to one
/// invocation; never persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TraceEntry {
    pub phase: String,
    pub start_sol: f64,
    pub end_sol: f64,
    /// Multiplier actually applied (phase multiplier x drawn variance).
    pub multiplier: f64,
    pub techniques: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExecutionReport {
    pub strategy_id: String,
    pub strategy_name: String,
    pub entry_sol: f64,
    pub final_sol: f64,
    pub total_multiplier: f64,
    pub hit_target: bool,
    pub trace: Vec<TraceEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BacktestReport {
    pub strategy_id: String,
    pub strategy_name: String,
    pub simulations: u32,
    /// Fraction of runs that completed all phases and reached the win
    /// threshold.
    pub win_rate: f64,
    pub mean_sol: f64,
    pub max_sol: f64,
    pub min_sol: f64,
}

/// Registry-wide aggregates for dashboard output.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StrategySummary {
    pub total_strategies: usize,
    pub total_entry_cost: f64,
    pub total_projected_target: f64,
    pub avg_win_rate: f64,
    pub deployed: usize,
}

pub mod constants {
    use solana_sdk::pubkey;
    use solana_sdk::pubkey::Pubkey;

    pub const SOL_MINT: Pubkey = pubkey!("So11111111111111111111111111111111111111112");
    pub const USDC_MINT: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
    pub const BONK_MINT: Pubkey = pubkey!("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263");
    pub const JUP_MINT: Pubkey = pubkey!("JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN");
    pub const WIF_MINT: Pubkey = pubkey!("EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm");
    pub const RAY_MINT: Pubkey = pubkey!("4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R");
    pub const JTO_MINT: Pubkey = pubkey!("jtojtomepa8beP8AuQc6eXt5FriJwfFMwQx2v2f9mCL");

    /// Majors polled by the quote refresher when TRACKED_TOKENS is unset.
    pub const MAJOR_TOKENS: &[(&str, Pubkey)] = &[
        ("SOL", SOL_MINT),
        ("USDC", USDC_MINT),
        ("BONK", BONK_MINT),
        ("JUP", JUP_MINT),
        ("WIF", WIF_MINT),
        ("RAY", RAY_MINT),
        ("JTO", JTO_MINT),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn major_token_symbols_and_mints_are_distinct() {
        let symbols: HashSet<_> = constants::MAJOR_TOKENS.iter().map(|(s, _)| *s).collect();
        let mints: HashSet<_> = constants::MAJOR_TOKENS.iter().map(|(_, m)| *m).collect();
        assert_eq!(symbols.len(), constants::MAJOR_TOKENS.len());
        assert_eq!(mints.len(), constants::MAJOR_TOKENS.len());
    }

    #[test]
    fn risk_tier_round_trips_unknown_tags() {
        let tier = RiskTier::new("galactic");
        assert_eq!(tier.as_str(), "galactic");
        let json = serde_json::to_string(&tier).unwrap();
        assert_eq!(json, "\"galactic\"");
        let back: RiskTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tier);
    }
}

