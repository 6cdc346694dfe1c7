//! Bollinger Band Breakout Strategy.
//!
//! Buys on the day the close falls below the lower band and sells on the day
//! it rises above the upper band.

use backtest_core::{
    closes, BacktestError, Indicator, IndicatorFrame, IndicatorValues, PriceBar, Signal,
    SignalStrategy,
};
use backtest_indicators::BollingerBands;

use crate::signal::{band_exit, scan};

/// Close price leaving the Bollinger envelope.
#[derive(Debug, Clone)]
pub struct BollingerStrategy {
    bands: BollingerBands,
    window: usize,
    num_std: f64,
}

impl BollingerStrategy {
    pub fn new(window: usize, num_std: f64) -> Result<Self, BacktestError> {
        Self::check_params(window, num_std)?;
        Ok(Self {
            bands: BollingerBands::new(window, num_std)?,
            window,
            num_std,
        })
    }

    pub fn check_params(window: usize, num_std: f64) -> Result<(), BacktestError> {
        if window < 2 {
            return Err(BacktestError::InvalidParameter(format!(
                "Bollinger window must be at least 2, got {}",
                window
            )));
        }
        if !num_std.is_finite() || num_std <= 0.0 {
            return Err(BacktestError::InvalidParameter(format!(
                "Bollinger std multiplier must be positive, got {}",
                num_std
            )));
        }
        Ok(())
    }
}

impl SignalStrategy for BollingerStrategy {
    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn validate(&self) -> Result<(), BacktestError> {
        Self::check_params(self.window, self.num_std)
    }

    fn lookback(&self) -> usize {
        self.bands.lookback()
    }

    fn frame(&self, bars: &[PriceBar]) -> IndicatorFrame {
        let values = self
            .bands
            .calculate(&closes(bars))
            .into_iter()
            .map(|out| IndicatorValues::Bollinger {
                middle: out.middle,
                upper: out.upper,
                lower: out.lower,
            })
            .collect();

        IndicatorFrame::align(bars, values)
    }

    fn signals(&self, frame: &IndicatorFrame) -> Vec<Signal> {
        scan(self.name(), frame, |prev, cur| match (prev.values, cur.values) {
            (
                IndicatorValues::Bollinger {
                    upper: prev_upper,
                    lower: prev_lower,
                    ..
                },
                IndicatorValues::Bollinger { upper, lower, .. },
            ) => band_exit(
                prev.close,
                (prev_lower, prev_upper),
                cur.close,
                (lower, upper),
            ),
            _ => None,
        })
    }
}
