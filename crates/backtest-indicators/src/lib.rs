//! Technical indicators with SIMD helpers.
//!
//! This crate provides the numeric kernels behind every strategy:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (Bollinger Bands, rolling standard deviation)
//!
//! Every kernel returns only fully-defined values; see
//! [`backtest_core::Indicator`] for the alignment contract.

pub mod momentum;
pub mod moving_average;
pub mod simd;
pub mod volatility;

pub use momentum::{Macd, MacdOutput, Rsi, RsiSmoothing};
pub use moving_average::{Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
