use std::env;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use executor::ExecutionSimulator;
use strategy::{PriceFeedPort, StrategyHub};
use tracing::{error, info};

mod api;
mod config;
mod deploy;
mod price_feed;
mod refresher;
mod rpc;
mod scheduler;
mod telemetry;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    info!("🚀 Strategy Engine Bootstrapping [Composition Root]...");

    // 1. Unified Configuration Layer (Fail Fast)
    let config = match config::EngineConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ CRITICAL: Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "✅ Config Loaded & Validated: RPC={}, quotes every {}ms, drift every {}ms",
        config.rpc_url, config.quote_refresh_ms, config.drift_refresh_ms
    );

    telemetry::init_metrics();

    // 2. Domain Services (seeded registry, caches, watchlist)
    let hub = Arc::new(StrategyHub::seeded());
    let simulator = Arc::new(ExecutionSimulator::with_variance(
        Arc::clone(&hub.registry),
        config.execution_variance,
    ));

    // 3. Infrastructure Adapters
    let price_feed: Arc<dyn PriceFeedPort> =
        Arc::new(price_feed::HttpPriceFeed::new(&config.price_api_url));
    let solana = rpc::SolanaRpc::new(&config.rpc_url);
    solana.probe(config.wallet_address.as_deref()).await;

    // 4. Optional Persistence Sync
    if let Some(ref database_url) = config.database_url {
        match deploy::build_pool(database_url) {
            Ok(pool) => {
                let store = Arc::new(deploy::PostgresStrategyStore::new(pool));
                if let Err(e) = store.init_schema().await {
                    error!("❌ Schema init failed: {:#}. Skipping catalog sync.", e);
                } else {
                    let service =
                        deploy::DeploymentService::new(Arc::clone(&hub.registry), store);
                    let summary = service.sync_all().await;
                    info!(
                        "🗄️ Catalog persisted: {} new, {} refreshed, {} failed",
                        summary.inserted, summary.updated, summary.failed
                    );
                }
            }
            Err(e) => {
                error!("❌ Could not build PG pool: {:#}. Running in-memory only.", e);
            }
        }
    } else {
        info!("📭 DATABASE_URL unset. Running in-memory only.");
    }

    // 5. Background Loops
    let mut tickers = vec![
        refresher::spawn_quote_refresher(
            Arc::clone(&hub.quotes),
            Arc::clone(&price_feed),
            config.tracked(),
            Duration::from_millis(config.quote_refresh_ms),
        ),
        refresher::spawn_performance_drift(
            Arc::clone(&hub.registry),
            config.drift_bandwidth,
            Duration::from_millis(config.drift_refresh_ms),
        ),
        refresher::spawn_target_drift(
            Arc::clone(&hub.targets),
            Duration::from_millis(config.momentum_refresh_ms),
        ),
    ];

    // 6. HTTP Read Surface
    let state = api::AppState::new(
        Arc::clone(&hub),
        Arc::clone(&simulator),
        config.default_simulations,
        config.max_simulations,
    );
    let router = api::router(state);
    let listener = match tokio::net::TcpListener::bind(&config.api_bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("❌ CRITICAL: cannot bind {}: {}", config.api_bind_addr, e);
            std::process::exit(1);
        }
    };
    info!("📊 API + metrics serving on {}", config.api_bind_addr);

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("HTTP server error: {}", e);
        }
    });

    info!("🔥 Engine IGNITION. {} strategies live.", hub.registry.len());

    // 7. Coordinated Exit
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for ctrl-c");
    info!("🛑 Shutdown signal received (Ctrl+C). Cleaning up...");

    for ticker in tickers.drain(..) {
        info!("⏹️ Draining ticker '{}'", ticker.name());
        ticker.stop().await;
    }
    server.abort();
    info!("👋 Engine shutting down gracefully. Goodbye!");
}
