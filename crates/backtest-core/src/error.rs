//! Error types for the backtester.

use thiserror::Error;

/// Top-level backtest error.
///
/// Configuration problems fail fast. Too little history for an indicator is
/// not an error: the engine returns an empty, well-typed result instead.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown strategy: {0} (expected one of: sma, macd, rsi, bollinger)")]
    UnknownStrategy(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
