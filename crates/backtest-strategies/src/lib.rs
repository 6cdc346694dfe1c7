//! Signal strategies.
//!
//! Each strategy builds its own indicator frame from price bars and turns
//! day-over-day changes in that frame into buy/sell signals:
//! - SMA Crossover (short vs. long simple moving average)
//! - MACD (MACD line vs. signal line)
//! - RSI (oversold/overbought thresholds)
//! - Bollinger Bands (close vs. the bands)

mod bollinger;
mod config;
mod macd;
mod registry;
mod rsi;
pub mod signal;
mod sma_crossover;

#[cfg(test)]
mod testing;

pub use bollinger::BollingerStrategy;
pub use config::{StrategyConfig, StrategyKind, StrategyParams};
pub use macd::MacdStrategy;
pub use registry::{StrategyInfo, StrategyRegistry};
pub use rsi::RsiStrategy;
pub use sma_crossover::SmaCrossoverStrategy;

pub use backtest_indicators::RsiSmoothing;
