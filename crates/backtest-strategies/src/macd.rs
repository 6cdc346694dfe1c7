//! MACD Signal-Line Crossover Strategy.
//!
//! Buys when the MACD line crosses above its signal line and sells when it
//! crosses back below.

use backtest_core::{
    closes, BacktestError, Indicator, IndicatorFrame, IndicatorValues, PriceBar, Signal,
    SignalStrategy,
};
use backtest_indicators::Macd;

use crate::signal::{crossover, scan};

/// MACD line vs. signal line crossover.
#[derive(Debug, Clone)]
pub struct MacdStrategy {
    macd: Macd,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdStrategy {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, BacktestError> {
        Self::check_params(fast, slow, signal)?;
        Ok(Self {
            macd: Macd::new(fast, slow, signal)?,
            fast,
            slow,
            signal,
        })
    }

    pub fn check_params(fast: usize, slow: usize, signal: usize) -> Result<(), BacktestError> {
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(BacktestError::InvalidParameter(
                "MACD periods must be greater than 0".into(),
            ));
        }
        if fast >= slow {
            return Err(BacktestError::InvalidParameter(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                fast, slow
            )));
        }
        Ok(())
    }
}

impl SignalStrategy for MacdStrategy {
    fn name(&self) -> &str {
        "MACD"
    }

    fn validate(&self) -> Result<(), BacktestError> {
        Self::check_params(self.fast, self.slow, self.signal)
    }

    fn lookback(&self) -> usize {
        self.macd.lookback()
    }

    fn frame(&self, bars: &[PriceBar]) -> IndicatorFrame {
        let values = self
            .macd
            .calculate(&closes(bars))
            .into_iter()
            .map(|out| IndicatorValues::Macd {
                macd: out.macd,
                signal: out.signal,
                histogram: out.histogram,
            })
            .collect();

        IndicatorFrame::align(bars, values)
    }

    fn signals(&self, frame: &IndicatorFrame) -> Vec<Signal> {
        scan(self.name(), frame, |prev, cur| match (prev.values, cur.values) {
            (
                IndicatorValues::Macd {
                    macd: prev_macd,
                    signal: prev_signal,
                    ..
                },
                IndicatorValues::Macd { macd, signal, .. },
            ) => crossover(prev_macd, prev_signal, macd, signal),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::bars;
    use backtest_core::SignalKind;

    #[test]
    fn test_params_validation() {
        assert!(MacdStrategy::new(12, 26, 9).is_ok());
        assert!(MacdStrategy::new(26, 12, 9).is_err());
        assert!(MacdStrategy::new(12, 26, 0).is_err());
    }

    #[test]
    fn test_frame_covers_every_bar() {
        let strategy = MacdStrategy::new(12, 26, 9).unwrap();
        assert_eq!(strategy.lookback(), 0);

        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = bars(&closes);
        let frame = strategy.frame(&bars);
        assert_eq!(frame.len(), 60);
        assert_eq!(frame.first().unwrap().date, bars[0].date);
        assert_eq!(
            frame.first().unwrap().values,
            IndicatorValues::Macd {
                macd: 0.0,
                signal: 0.0,
                histogram: 0.0
            }
        );
    }

    #[test]
    fn test_early_crossover_is_kept() {
        let strategy = MacdStrategy::new(12, 26, 9).unwrap();
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        closes.extend((0..60).map(|i| 81.0 + i as f64));
        let bars = bars(&closes);

        let signals = strategy.signals(&strategy.frame(&bars));
        let kinds: Vec<_> = signals.iter().map(|s| (s.date, s.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (bars[1].date, SignalKind::Sell),
                (bars[24].date, SignalKind::Buy)
            ]
        );
    }

    #[test]
    fn test_trend_reversal_signals() {
        let strategy = MacdStrategy::new(3, 6, 3).unwrap();
        // Down, then up, then down again.
        let mut closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        closes.extend((0..15).map(|i| 86.0 + 2.0 * i as f64));
        closes.extend((0..15).map(|i| 114.0 - 2.0 * i as f64));

        let signals = strategy.signals(&strategy.frame(&bars(&closes)));
        assert!(signals.iter().any(|s| s.kind == SignalKind::Buy));
        assert!(signals.iter().any(|s| s.kind == SignalKind::Sell));
        assert!(signals.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_flat_series_has_no_signals() {
        let strategy = MacdStrategy::new(12, 26, 9).unwrap();
        let frame = strategy.frame(&bars(&[57.25; 80]));
        assert!(!frame.is_empty());
        assert!(strategy.signals(&frame).is_empty());
    }
}
