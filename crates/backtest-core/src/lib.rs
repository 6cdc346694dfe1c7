//! Core types and traits for the strategy backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Market data (`PriceBar`) and its ordering checks
//! - Indicator frames aligned to price dates
//! - Signals and trades
//! - Core traits for indicators, signal strategies and price sources

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BacktestError, DataError, IndicatorError};
pub use traits::*;
pub use types::*;
