use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use executor::{BacktestConfig, ExecutionError, ExecutionSimulator, SeededSource};
use serde::Deserialize;
use std::sync::Arc;
use strategy::{QueryFacade, SortKey, StrategyHub};

/// Shared read surface over the hub. All routes return plain JSON shapes;
/// a missing strategy is the only 404, everything else serves whatever the
/// background loops last published.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<StrategyHub>,
    pub facade: Arc<QueryFacade>,
    pub simulator: Arc<ExecutionSimulator>,
    pub default_simulations: u32,
    pub max_simulations: u32,
}

impl AppState {
    pub fn new(
        hub: Arc<StrategyHub>,
        simulator: Arc<ExecutionSimulator>,
        default_simulations: u32,
        max_simulations: u32,
    ) -> Self {
        let facade = Arc::new(QueryFacade::new(Arc::clone(&hub.registry)));
        Self {
            hub,
            facade,
            simulator,
            default_simulations,
            max_simulations,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/strategies", get(list_strategies))
        .route("/strategies/deployed", get(deployed_strategies))
        .route("/strategies/top", get(top_strategies))
        .route("/strategies/:id/execute", post(execute_strategy))
        .route("/strategies/:id/backtest", post(backtest_strategy))
        .route("/summary", get(summary))
        .route("/quotes", get(quotes))
        .route("/targets", get(targets))
        .route("/targets/:mint/claim", post(claim_target))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_strategies(State(state): State<AppState>) -> Response {
    Json(state.hub.registry.list()).into_response()
}

async fn deployed_strategies(State(state): State<AppState>) -> Response {
    Json(state.facade.deployed()).into_response()
}

#[derive(Deserialize)]
struct TopParams {
    n: Option<usize>,
    key: Option<String>,
    min_win_rate: Option<f64>,
}

async fn top_strategies(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Response {
    let key = match params.key.as_deref().unwrap_or("multiplier").parse::<SortKey>() {
        Ok(key) => key,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let floor = params.min_win_rate.unwrap_or(0.0);
    let top = state
        .facade
        .top_n(params.n.unwrap_or(5), key, |r| r.win_rate >= floor);
    Json(top).into_response()
}

async fn summary(State(state): State<AppState>) -> Response {
    Json(state.facade.summary()).into_response()
}

async fn quotes(State(state): State<AppState>) -> Response {
    Json(state.hub.quotes.hot().snapshot()).into_response()
}

async fn targets(State(state): State<AppState>) -> Response {
    Json(state.hub.targets.top_momentum(usize::MAX)).into_response()
}

async fn claim_target(State(state): State<AppState>, Path(mint): Path<String>) -> Response {
    match state.hub.targets.claim(&mint) {
        Some(target) => {
            crate::telemetry::TARGETS_CLAIMED.inc();
            Json(target).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("target {mint} not tracked")).into_response(),
    }
}

async fn execute_strategy(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut source = SeededSource::entropy();
    match state.simulator.execute(&id, &mut source) {
        Ok(report) => {
            crate::telemetry::EXECUTIONS_TOTAL.inc();
            Json(report).into_response()
        }
        Err(e @ ExecutionError::StrategyNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

#[derive(Deserialize)]
struct BacktestParams {
    simulations: Option<u32>,
    seed: Option<u64>,
}

async fn backtest_strategy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<BacktestParams>,
) -> Response {
    let simulations = params
        .simulations
        .unwrap_or(state.default_simulations)
        .min(state.max_simulations);
    let config = BacktestConfig {
        simulations,
        variance: state.simulator.variance(),
        ..Default::default()
    };
    let mut source = match params.seed {
        Some(seed) => SeededSource::new(seed),
        None => SeededSource::entropy(),
    };

    match state.simulator.backtest(&id, &config, &mut source) {
        Ok(report) => {
            crate::telemetry::BACKTESTS_TOTAL.inc();
            Json(report).into_response()
        }
        Err(e @ ExecutionError::StrategyNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

async fn metrics() -> Response {
    crate::telemetry::gather().into_response()
}
