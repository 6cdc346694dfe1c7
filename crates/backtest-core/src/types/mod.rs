//! Core data types for the backtester.

mod bar;
mod frame;
mod signal;
mod trade;

pub use bar::{closes, validate_bars, PriceBar};
pub use frame::{IndicatorFrame, IndicatorRow, IndicatorValues};
pub use signal::{Signal, SignalKind};
pub use trade::Trade;
