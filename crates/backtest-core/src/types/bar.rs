//! Daily OHLCV price bars.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::BacktestError;

/// One trading day of OHLCV data.
///
/// Uses f64 for fast indicator calculations. `close` is the execution price
/// for every signal raised on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl PriceBar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar whose open, high, low and close are all `close`.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close, 0.0)
    }
}

/// Extract close prices as a vector.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Check the price-series invariants every backtest relies on.
///
/// Rejects an empty series, non-finite or non-positive closes, and dates that
/// are not strictly increasing.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), BacktestError> {
    if bars.is_empty() {
        return Err(BacktestError::InvalidInput(
            "no price data supplied".to_string(),
        ));
    }

    for (i, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(BacktestError::InvalidInput(format!(
                "close price on {} must be a positive finite number, got {}",
                bar.date, bar.close
            )));
        }
        if i > 0 && bars[i - 1].date >= bar.date {
            return Err(BacktestError::InvalidInput(format!(
                "dates must be strictly increasing: {} followed by {}",
                bars[i - 1].date,
                bar.date
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_closes() {
        let bars = vec![PriceBar::flat(day(2), 100.5), PriceBar::flat(day(3), 101.5)];
        assert_eq!(closes(&bars), vec![100.5, 101.5]);
    }

    #[test]
    fn test_validate_empty() {
        let err = validate_bars(&[]).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_duplicate_dates() {
        let bars = vec![PriceBar::flat(day(2), 100.0), PriceBar::flat(day(2), 101.0)];
        assert!(matches!(
            validate_bars(&bars),
            Err(BacktestError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_descending_dates() {
        let bars = vec![PriceBar::flat(day(3), 100.0), PriceBar::flat(day(2), 101.0)];
        assert!(validate_bars(&bars).is_err());
    }

    #[test]
    fn test_validate_bad_close() {
        let bars = vec![PriceBar::flat(day(2), f64::NAN)];
        assert!(validate_bars(&bars).is_err());

        let bars = vec![PriceBar::flat(day(2), 0.0)];
        assert!(validate_bars(&bars).is_err());
    }

    #[test]
    fn test_validate_gaps_allowed() {
        let bars = vec![
            PriceBar::flat(day(2), 100.0),
            PriceBar::flat(day(5), 101.0),
            PriceBar::flat(day(9), 99.0),
        ];
        assert!(validate_bars(&bars).is_ok());
    }
}
