use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sim_core::StrategyRecord;
use std::sync::Arc;
use strategy::{StrategyRegistry, StrategyStore, UpsertOutcome};

/// Outcome of one catalog sync pass.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SyncSummary {
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
    pub total_cost_sol: f64,
}

/// Pushes the in-memory catalog into the external store, keyed by unique
/// strategy name. Re-running is safe: the second pass updates deploy flags
/// and timestamps on the existing rows instead of growing the table.
pub struct DeploymentService {
    registry: Arc<StrategyRegistry>,
    store: Arc<dyn StrategyStore>,
}

impl DeploymentService {
    pub fn new(registry: Arc<StrategyRegistry>, store: Arc<dyn StrategyStore>) -> Self {
        Self { registry, store }
    }

    /// Upsert every registry record. Per-record failures are collected and
    /// logged; the batch always runs to completion.
    pub async fn sync_all(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();

        for record in self.registry.list() {
            let deployed_at = Utc::now();
            match self.store.upsert_strategy(&record, deployed_at).await {
                Ok(outcome) => {
                    crate::telemetry::STRATEGIES_SYNCED.inc();
                    match outcome {
                        UpsertOutcome::Inserted => summary.inserted += 1,
                        UpsertOutcome::Updated => summary.updated += 1,
                    }
                    summary.total_cost_sol += record.entry_sol;
                    self.registry.update(&record.id, |r| {
                        r.is_deployed = true;
                        r.deployed_at = Some(deployed_at);
                    });
                }
                Err(e) => {
                    summary.failed += 1;
                    crate::telemetry::SYNC_FAILURES.inc();
                    tracing::warn!("❌ Failed to sync strategy {}: {:#}", record.name, e);
                }
            }
        }

        crate::telemetry::DEPLOYED_STRATEGIES.set(
            self.registry
                .list()
                .iter()
                .filter(|r| r.is_deployed)
                .count() as i64,
        );
        tracing::info!(
            "📤 Catalog sync: {} inserted, {} updated, {} failed ({:.3} SOL total entry cost)",
            summary.inserted,
            summary.updated,
            summary.failed,
            summary.total_cost_sol
        );
        summary
    }
}

/// Postgres-backed strategy store.
pub struct PostgresStrategyStore {
    pool: deadpool_postgres::Pool,
}

impl PostgresStrategyStore {
    pub fn new(pool: deadpool_postgres::Pool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        let client = self.pool.get().await.context("acquire pg client")?;
        client
            .batch_execute(
                "
                CREATE TABLE IF NOT EXISTS trading_strategies (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    entry_sol DOUBLE PRECISION NOT NULL,
                    target_sol DOUBLE PRECISION NOT NULL,
                    scaling_multiplier DOUBLE PRECISION NOT NULL,
                    win_rate DOUBLE PRECISION NOT NULL,
                    profit_velocity DOUBLE PRECISION NOT NULL,
                    risk TEXT NOT NULL,
                    special_features JSONB NOT NULL DEFAULT '[]',
                    phases JSONB NOT NULL DEFAULT '[]',
                    performance JSONB NOT NULL DEFAULT '{}',
                    is_deployed BOOLEAN NOT NULL DEFAULT FALSE,
                    deployed_at TIMESTAMPTZ
                );
                CREATE INDEX IF NOT EXISTS idx_trading_strategies_multiplier
                    ON trading_strategies (scaling_multiplier DESC);
                ",
            )
            .await
            .context("create trading_strategies table")?;
        tracing::info!("🗄️ trading_strategies table verified/created.");
        Ok(())
    }
}

#[async_trait::async_trait]
impl StrategyStore for PostgresStrategyStore {
    async fn upsert_strategy(
        &self,
        record: &StrategyRecord,
        deployed_at: chrono::DateTime<Utc>,
    ) -> Result<UpsertOutcome> {
        let client = self.pool.get().await.context("acquire pg client")?;
        let phases = serde_json::to_value(&record.phases)?;
        let performance = serde_json::to_value(&record.performance)?;
        let features = serde_json::to_value(&record.special_features)?;

        // xmax = 0 only on freshly inserted rows, so one round trip tells
        // insert apart from conflict-update.
        let row = client
            .query_one(
                "INSERT INTO trading_strategies
                     (id, name, entry_sol, target_sol, scaling_multiplier, win_rate,
                      profit_velocity, risk, special_features, phases, performance,
                      is_deployed, deployed_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, $12)
                 ON CONFLICT (name) DO UPDATE SET
                     entry_sol = $3, target_sol = $4, scaling_multiplier = $5,
                     win_rate = $6, profit_velocity = $7, risk = $8,
                     special_features = $9, phases = $10, performance = $11,
                     is_deployed = TRUE, deployed_at = $12
                 RETURNING (xmax = 0) AS inserted",
                &[
                    &record.id,
                    &record.name,
                    &record.entry_sol,
                    &record.target_sol,
                    &record.scaling_multiplier,
                    &record.win_rate,
                    &record.profit_velocity,
                    &record.risk.as_str(),
                    &tokio_postgres::types::Json(features),
                    &tokio_postgres::types::Json(phases),
                    &tokio_postgres::types::Json(performance),
                    &deployed_at,
                ],
            )
            .await
            .with_context(|| format!("upsert strategy {}", record.name))?;

        let inserted: bool = row.get("inserted");
        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }
}

/// Build a deadpool pool from a postgres URL.
pub fn build_pool(database_url: &str) -> Result<deadpool_postgres::Pool> {
    let pg_config: tokio_postgres::Config =
        database_url.parse().context("parse DATABASE_URL")?;
    let manager = deadpool_postgres::Manager::from_config(
        pg_config,
        tokio_postgres::NoTls,
        deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        },
    );
    deadpool_postgres::Pool::builder(manager)
        .max_size(4)
        .build()
        .context("build pg pool")
}
