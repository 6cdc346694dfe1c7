//! Backtesting engine.
//!
//! Runs a strategy over a price series: indicator frame, signals, a
//! FLAT/LONG trade simulation and summary statistics.

mod engine;
mod report;
pub mod simulator;
mod statistics;

pub use engine::{BacktestEngine, BacktestOutcome};
pub use simulator::simulate;
pub use statistics::BacktestResult;
