//! Moving average indicators.

use backtest_core::error::IndicatorError;
use backtest_core::traits::Indicator;

use crate::simd::mean_simd;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA period must be greater than 0".into(),
            ));
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.min_len() {
            return vec![];
        }

        // Each window is averaged on its own so equal windows give equal means.
        data.windows(self.period).map(mean_simd).collect()
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using an exponential decay with
/// `α = 2 / (period + 1)`. The recursion starts at the first input, so every
/// position has a value and there is no warm-up.
#[derive(Debug, Clone)]
pub struct Ema {
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "EMA period must be greater than 0".into(),
            ));
        }
        let multiplier = 2.0 / (period as f64 + 1.0);
        Ok(Self { multiplier })
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let Some((&first, rest)) = data.split_first() else {
            return vec![];
        };

        let mut result = Vec::with_capacity(data.len());
        let mut ema = first;
        result.push(ema);

        // Incremental form keeps a constant input exactly constant.
        for &price in rest {
            ema += self.multiplier * (price - ema);
            result.push(ema);
        }

        result
    }

    fn lookback(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "EMA"
    }
}
