use crate::scheduler::{Ticker, TickerHandle};
use sim_core::math;
use std::sync::Arc;
use std::time::Duration;
use strategy::{CacheBank, PriceFeedPort, StrategyRegistry, TargetTracker};

const QUOTE_SOURCE: &str = "price-feed";
const QUOTE_CONFIDENCE: f64 = 95.0;

// Drift bands per field. Win rate moves an order of magnitude slower than
// velocity, mirroring how the dashboards expect those figures to behave.
const WIN_RATE_BANDWIDTH_SCALE: f64 = 0.1;
const MOMENTUM_BANDWIDTH: f64 = 0.08;
const VOLATILITY_BANDWIDTH: f64 = 0.05;

/// One pass of the quote refresher: fetch every tracked token and publish
/// into the hot cache. A failed fetch leaves the previous entry in place;
/// partial failure surfaces as a tick error after the loop completes so the
/// failure counter reflects degraded ticks.
pub async fn refresh_quotes_once(
    quotes: &CacheBank,
    feed: &dyn PriceFeedPort,
    tokens: &[String],
) -> anyhow::Result<()> {
    let hot = quotes.hot();
    let mut failed = 0usize;

    for token in tokens {
        match feed.fetch_price(token).await {
            Ok(price) => {
                if hot.set(token, price, QUOTE_SOURCE, QUOTE_CONFIDENCE) {
                    crate::telemetry::QUOTE_WRITES.inc();
                } else {
                    crate::telemetry::STALE_QUOTE_DROPS.inc();
                }
            }
            Err(e) => {
                failed += 1;
                crate::telemetry::QUOTE_FETCH_FAILURES.inc();
                tracing::warn!("💸 Quote fetch failed for {}: {:#}. Keeping last value.", token, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} quote fetches failed", tokens.len());
    }
    Ok(())
}

pub fn spawn_quote_refresher(
    quotes: Arc<CacheBank>,
    feed: Arc<dyn PriceFeedPort>,
    tokens: Vec<String>,
    period: Duration,
) -> TickerHandle {
    Ticker::spawn("quote-refresher", period, move || {
        let quotes = Arc::clone(&quotes);
        let feed = Arc::clone(&feed);
        let tokens = tokens.clone();
        async move { refresh_quotes_once(&quotes, feed.as_ref(), &tokens).await }
    })
}

/// One pass of the performance drift: nudge each strategy's live numbers
/// inside a narrow band so repeated reads look like a moving market.
pub fn drift_performance_once(registry: &StrategyRegistry, bandwidth: f64) {
    for id in registry.ids() {
        registry.update(&id, |record| {
            let w = math::drift(
                record.win_rate,
                rand::random::<f64>(),
                bandwidth * WIN_RATE_BANDWIDTH_SCALE,
            );
            record.win_rate = math::clamp_unit(w);
            record.profit_velocity =
                math::drift(record.profit_velocity, rand::random::<f64>(), bandwidth);
            record.performance.win_rate = record.win_rate;
            record.performance.profit_velocity = record.profit_velocity;
        });
    }
}

pub fn spawn_performance_drift(
    registry: Arc<StrategyRegistry>,
    bandwidth: f64,
    period: Duration,
) -> TickerHandle {
    Ticker::spawn("performance-drift", period, move || {
        let registry = Arc::clone(&registry);
        async move {
            drift_performance_once(&registry, bandwidth);
            Ok(())
        }
    })
}

/// One pass of the watchlist drift: momentum and volatility wander, clamped
/// to the 0..=100 gauge range the dashboards render.
pub fn drift_targets_once(targets: &TargetTracker) {
    targets.apply_drift(|target| {
        target.momentum =
            math::drift(target.momentum, rand::random::<f64>(), MOMENTUM_BANDWIDTH).clamp(0.0, 100.0);
        target.volatility = math::drift(target.volatility, rand::random::<f64>(), VOLATILITY_BANDWIDTH)
            .clamp(0.0, 100.0);
    });
}

pub fn spawn_target_drift(targets: Arc<TargetTracker>, period: Duration) -> TickerHandle {
    Ticker::spawn("target-momentum", period, move || {
        let targets = Arc::clone(&targets);
        async move {
            drift_targets_once(&targets);
            Ok(())
        }
    })
}
