//! Simple Moving Average Crossover Strategy.
//!
//! Buys when the short SMA crosses above the long SMA and sells when it
//! crosses back below.

use backtest_core::{
    closes, BacktestError, Indicator, IndicatorFrame, IndicatorValues, PriceBar, Signal,
    SignalStrategy,
};
use backtest_indicators::Sma;

use crate::signal::{crossover, scan};

/// Short/long SMA crossover.
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    short: Sma,
    long: Sma,
}

impl SmaCrossoverStrategy {
    /// Create the strategy after checking the windows.
    pub fn new(short: usize, long: usize) -> Result<Self, BacktestError> {
        Self::check_params(short, long)?;
        Ok(Self {
            short: Sma::new(short)?,
            long: Sma::new(long)?,
        })
    }

    pub fn check_params(short: usize, long: usize) -> Result<(), BacktestError> {
        if short == 0 || long == 0 {
            return Err(BacktestError::InvalidParameter(
                "SMA windows must be greater than 0".into(),
            ));
        }
        if short >= long {
            return Err(BacktestError::InvalidParameter(format!(
                "SMA short window ({}) must be less than long window ({})",
                short, long
            )));
        }
        Ok(())
    }
}

impl SignalStrategy for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        "SMA Crossover"
    }

    fn validate(&self) -> Result<(), BacktestError> {
        Self::check_params(self.short.period(), self.long.period())
    }

    fn lookback(&self) -> usize {
        self.long.lookback()
    }

    fn frame(&self, bars: &[PriceBar]) -> IndicatorFrame {
        let closes = closes(bars);
        let long = self.long.calculate(&closes);
        if long.is_empty() {
            return IndicatorFrame::empty();
        }

        // The short SMA starts earlier; drop its extra leading values.
        let short = self.short.calculate(&closes);
        let skip = short.len() - long.len();

        let values = short[skip..]
            .iter()
            .zip(long.iter())
            .map(|(&short, &long)| IndicatorValues::Sma { short, long })
            .collect();

        IndicatorFrame::align(bars, values)
    }

    fn signals(&self, frame: &IndicatorFrame) -> Vec<Signal> {
        scan(self.name(), frame, |prev, cur| match (prev.values, cur.values) {
            (
                IndicatorValues::Sma {
                    short: prev_short,
                    long: prev_long,
                },
                IndicatorValues::Sma { short, long },
            ) => crossover(prev_short, prev_long, short, long),
            _ => None,
        })
    }
}
