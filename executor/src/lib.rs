pub mod backtest;
pub mod rng;
pub mod simulator;

pub use backtest::BacktestConfig;
pub use rng::{Midpoint, PerturbationSource, SeededSource};
pub use simulator::{ExecutionError, ExecutionSimulator};
