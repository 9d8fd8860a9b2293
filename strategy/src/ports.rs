// Port definitions for the infrastructure seams.
// The registry/refresh/query core must run with every one of these mocked.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sim_core::StrategyRecord;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

/// Port for external price quotes.
/// A failed fetch means "value unavailable this tick" — callers keep the
/// previous cached value and try again next tick.
#[async_trait::async_trait]
pub trait PriceFeedPort: Send + Sync {
    async fn fetch_price(&self, token: &str) -> Result<f64>;
}

/// Port for the Solana JSON-RPC connection handle.
/// Nothing in the core pattern depends on these calls succeeding; adapters
/// may be fully mocked.
#[async_trait::async_trait]
pub trait RpcPort: Send + Sync {
    async fn fetch_signatures(&self, address: &Pubkey, limit: usize) -> Result<Vec<String>>;
    async fn fetch_transaction(&self, signature: &str) -> Result<serde_json::Value>;
    async fn send_transaction(&self, transaction: &Transaction) -> Result<String>;
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;
    async fn confirm_transaction(&self, signature: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Port for strategy persistence. Upserts are keyed by unique `name`:
/// a repeat sync updates the deploy flag and timestamp, never duplicates.
#[async_trait::async_trait]
pub trait StrategyStore: Send + Sync {
    async fn upsert_strategy(
        &self,
        record: &StrategyRecord,
        deployed_at: DateTime<Utc>,
    ) -> Result<UpsertOutcome>;
}
