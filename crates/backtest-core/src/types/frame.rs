//! Indicator frames aligned to price dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PriceBar;

/// Indicator values for one date. One variant per strategy family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorValues {
    /// Short and long simple moving averages
    Sma { short: f64, long: f64 },
    /// MACD line, signal line and histogram
    Macd {
        macd: f64,
        signal: f64,
        histogram: f64,
    },
    /// Relative strength index
    Rsi { rsi: f64 },
    /// Bollinger middle, upper and lower bands
    Bollinger { middle: f64, upper: f64, lower: f64 },
}

/// One fully-defined row of an indicator frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub values: IndicatorValues,
}

/// Indicator series sharing the date index of the price bars it was built
/// from, with warm-up rows removed.
///
/// Every row has every column defined. The frame's dates are always the
/// trailing `len()` dates of the source bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// An empty frame (not enough history for the indicator).
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Align indicator values to the trailing bars.
    ///
    /// Kernels return only defined values, so `values[0]` belongs to
    /// `bars[bars.len() - values.len()]`. Extra leading values (more values
    /// than bars) are dropped.
    pub fn align(bars: &[PriceBar], values: Vec<IndicatorValues>) -> Self {
        let skip_values = values.len().saturating_sub(bars.len());
        let offset = bars.len() - (values.len() - skip_values);

        let rows = bars[offset..]
            .iter()
            .zip(values.into_iter().skip(skip_values))
            .map(|(bar, values)| IndicatorRow {
                date: bar.date,
                close: bar.close,
                values,
            })
            .collect();

        Self { rows }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorRow> {
        self.rows.iter()
    }

    /// Consecutive `(previous, current)` row pairs, in date order.
    pub fn pairs(&self) -> impl Iterator<Item = (&IndicatorRow, &IndicatorRow)> {
        self.rows.windows(2).map(|w| (&w[0], &w[1]))
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn first(&self) -> Option<&IndicatorRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}
