//! RSI Threshold Strategy.
//!
//! Buys on the day RSI drops below the lower threshold and sells on the day
//! it rises above the upper threshold.

use backtest_core::{
    closes, BacktestError, Indicator, IndicatorFrame, IndicatorValues, PriceBar, Signal,
    SignalStrategy,
};
use backtest_indicators::{Rsi, RsiSmoothing};

use crate::signal::{band_exit, scan};

/// RSI oversold/overbought threshold crossing.
#[derive(Debug, Clone)]
pub struct RsiStrategy {
    rsi: Rsi,
    period: usize,
    lower: f64,
    upper: f64,
}

impl RsiStrategy {
    pub fn new(
        lower: f64,
        upper: f64,
        period: usize,
        smoothing: RsiSmoothing,
    ) -> Result<Self, BacktestError> {
        Self::check_params(lower, upper, period)?;
        Ok(Self {
            rsi: Rsi::new(period, smoothing)?,
            period,
            lower,
            upper,
        })
    }

    pub fn check_params(lower: f64, upper: f64, period: usize) -> Result<(), BacktestError> {
        if period == 0 {
            return Err(BacktestError::InvalidParameter(
                "RSI period must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&lower) || !(0.0..=100.0).contains(&upper) {
            return Err(BacktestError::InvalidParameter(format!(
                "RSI thresholds must be between 0 and 100, got {}/{}",
                lower, upper
            )));
        }
        if lower >= upper {
            return Err(BacktestError::InvalidParameter(format!(
                "RSI lower threshold ({}) must be below upper threshold ({})",
                lower, upper
            )));
        }
        Ok(())
    }
}

impl SignalStrategy for RsiStrategy {
    fn name(&self) -> &str {
        "RSI"
    }

    fn validate(&self) -> Result<(), BacktestError> {
        Self::check_params(self.lower, self.upper, self.period)
    }

    fn lookback(&self) -> usize {
        self.rsi.lookback()
    }

    fn frame(&self, bars: &[PriceBar]) -> IndicatorFrame {
        let values = self
            .rsi
            .calculate(&closes(bars))
            .into_iter()
            .map(|rsi| IndicatorValues::Rsi { rsi })
            .collect();

        IndicatorFrame::align(bars, values)
    }

    fn signals(&self, frame: &IndicatorFrame) -> Vec<Signal> {
        let band = (self.lower, self.upper);
        scan(self.name(), frame, |prev, cur| match (prev.values, cur.values) {
            (IndicatorValues::Rsi { rsi: prev_rsi }, IndicatorValues::Rsi { rsi }) => {
                band_exit(prev_rsi, band, rsi, band)
            }
            _ => None,
        })
    }
}
