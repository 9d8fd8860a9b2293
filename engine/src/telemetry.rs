use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Background loop health
    pub static ref TICKS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("ticks_total", "Background ticks fired, per loop"),
        &["loop"]
    ).unwrap();

    pub static ref TICK_FAILURES: CounterVec = CounterVec::new(
        Opts::new("tick_failures_total", "Background ticks that failed, per loop"),
        &["loop"]
    ).unwrap();

    // Quote cache
    pub static ref QUOTE_WRITES: Counter = Counter::new(
        "quote_writes_total",
        "Quote cache entries written"
    ).unwrap();

    pub static ref QUOTE_FETCH_FAILURES: Counter = Counter::new(
        "quote_fetch_failures_total",
        "Price feed fetches that failed (previous value retained)"
    ).unwrap();

    pub static ref STALE_QUOTE_DROPS: Counter = Counter::new(
        "stale_quote_drops_total",
        "Quote writes dropped by the monotonic timestamp guard"
    ).unwrap();

    // Simulation surface
    pub static ref EXECUTIONS_TOTAL: Counter = Counter::new(
        "executions_total",
        "Strategy executions run"
    ).unwrap();

    pub static ref BACKTESTS_TOTAL: Counter = Counter::new(
        "backtests_total",
        "Monte-Carlo backtests run"
    ).unwrap();

    pub static ref TARGETS_CLAIMED: Counter = Counter::new(
        "targets_claimed_total",
        "Snipe targets claimed and removed"
    ).unwrap();

    // Persistence sync
    pub static ref STRATEGIES_SYNCED: Counter = Counter::new(
        "strategies_synced_total",
        "Strategy records upserted to the store"
    ).unwrap();

    pub static ref SYNC_FAILURES: Counter = Counter::new(
        "sync_failures_total",
        "Strategy upserts that failed"
    ).unwrap();

    // RPC health
    pub static ref RPC_ERRORS: Counter = Counter::new(
        "rpc_errors_total",
        "Solana RPC calls that failed"
    ).unwrap();

    pub static ref DEPLOYED_STRATEGIES: IntGauge = IntGauge::new(
        "deployed_strategies",
        "Strategies currently flagged as deployed"
    ).unwrap();
}

pub fn init_metrics() {
    REGISTRY.register(Box::new(TICKS_TOTAL.clone())).unwrap();
    REGISTRY.register(Box::new(TICK_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(QUOTE_WRITES.clone())).unwrap();
    REGISTRY.register(Box::new(QUOTE_FETCH_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(STALE_QUOTE_DROPS.clone())).unwrap();
    REGISTRY.register(Box::new(EXECUTIONS_TOTAL.clone())).unwrap();
    REGISTRY.register(Box::new(BACKTESTS_TOTAL.clone())).unwrap();
    REGISTRY.register(Box::new(TARGETS_CLAIMED.clone())).unwrap();
    REGISTRY.register(Box::new(STRATEGIES_SYNCED.clone())).unwrap();
    REGISTRY.register(Box::new(SYNC_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(RPC_ERRORS.clone())).unwrap();
    REGISTRY.register(Box::new(DEPLOYED_STRATEGIES.clone())).unwrap();
}

/// Prometheus text exposition for the /metrics route.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
