//! Momentum indicators.

use backtest_core::error::IndicatorError;
use backtest_core::traits::Indicator;
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;
use crate::simd::{gains_losses_simd, sum_simd};

/// How RSI averages gains and losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    /// Rolling arithmetic mean over the last `period` changes
    #[default]
    Simple,
    /// Wilder's recursive smoothing seeded with the first simple mean
    Wilder,
}

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: RsiSmoothing,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize, smoothing: RsiSmoothing) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI period must be greater than 0".into(),
            ));
        }
        Ok(Self { period, smoothing })
    }

    /// Rolling mean of each `period`-long window.
    fn simple_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }
        let period_f64 = period as f64;
        values
            .windows(period)
            .map(|w| sum_simd(w) / period_f64)
            .collect()
    }

    /// Calculate using Wilder's smoothing method.
    fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
        if values.len() < period {
            return vec![];
        }

        let mut result = Vec::with_capacity(values.len() - period + 1);
        let period_f64 = period as f64;

        // Initial average
        let mut avg: f64 = sum_simd(&values[..period]) / period_f64;
        result.push(avg);

        // Wilder's smoothing: avg = (prev_avg * (period-1) + value) / period
        for &value in &values[period..] {
            avg = (avg * (period_f64 - 1.0) + value) / period_f64;
            result.push(avg);
        }

        result
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // No losses: all gains is 100, no movement at all is neutral.
            if avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.min_len() {
            return vec![];
        }

        let (gains, losses) = gains_losses_simd(data);

        let (avg_gains, avg_losses) = match self.smoothing {
            RsiSmoothing::Simple => (
                Self::simple_smooth(&gains, self.period),
                Self::simple_smooth(&losses, self.period),
            ),
            RsiSmoothing::Wilder => (
                Self::wilder_smooth(&gains, self.period),
                Self::wilder_smooth(&losses, self.period),
            ),
        };

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| Self::from_averages(gain, loss).clamp(0.0, 100.0))
            .collect()
    }

    fn lookback(&self) -> usize {
        self.period // first change needs a previous close
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a MACD with custom periods.
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        if fast >= slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period ({}) must be less than slow period ({})",
                fast, slow
            )));
        }
        Ok(Self {
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
        })
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        // Every EMA is defined from the first input, so the lines share one index.
        let fast_ema = self.fast.calculate(data);
        let slow_ema = self.slow.calculate(data);

        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal_line = self.signal.calculate(&macd_line);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14, RsiSmoothing::Simple).unwrap();
        // Generate test data with alternating up/down moves
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), data.len() - rsi.lookback());

        // All RSI values should be between 0 and 100
        for value in &result {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        for smoothing in [RsiSmoothing::Simple, RsiSmoothing::Wilder] {
            let rsi = Rsi::new(5, smoothing).unwrap();
            let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
            let result = rsi.calculate(&data);

            assert_eq!(result.len(), 2);
            // All gains = RSI should be 100
            assert!((result[0] - 100.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5, RsiSmoothing::Simple).unwrap();
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);

        assert!(!result.is_empty());
        // All losses = RSI should be 0
        assert!(result[0].abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let rsi = Rsi::new(14, RsiSmoothing::Simple).unwrap();
        let result = rsi.calculate(&[100.0; 30]);
        assert!(result.iter().all(|&v| v == 50.0));
    }

    #[test]
    fn test_rsi_simple_value() {
        // changes: +2, -1, +1 ; period 3 -> avg gain 1, avg loss 1/3 -> RS 3 -> RSI 75
        let rsi = Rsi::new(3, RsiSmoothing::Simple).unwrap();
        let result = rsi.calculate(&[10.0, 12.0, 11.0, 12.0]);
        assert_eq!(result.len(), 1);
        assert!((result[0] - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_simple_forgets_old_changes() {
        // A loss leaves the window entirely: simple RSI returns to 100, Wilder does not.
        let data = vec![10.0, 9.0, 10.0, 11.0, 12.0];
        let simple = Rsi::new(2, RsiSmoothing::Simple).unwrap().calculate(&data);
        let wilder = Rsi::new(2, RsiSmoothing::Wilder).unwrap().calculate(&data);

        assert!((simple.last().unwrap() - 100.0).abs() < 1e-10);
        assert!(*wilder.last().unwrap() < 100.0);
    }

    #[test]
    fn test_macd_basic() {
        let macd = Macd::new(12, 26, 9).unwrap();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data);

        assert_eq!(macd.lookback(), 0);
        assert_eq!(result.len(), data.len());
        assert_eq!(result[0].macd, 0.0);
        assert_eq!(result[0].signal, 0.0);
        // In an uptrend, MACD should be positive
        assert!(result.last().unwrap().macd > 0.0);
    }

    #[test]
    fn test_macd_matches_recursive_ema() {
        // fast 2 (α 2/3), slow 4 (α 2/5), signal 2 (α 2/3), all seeded with the first value
        let macd = Macd::new(2, 4, 2).unwrap();
        let result = macd.calculate(&[10.0, 11.0, 13.0, 12.0, 14.0]);

        let expected = [
            (0.0, 0.0),
            (0.266_666_666_666_666, 0.177_777_777_777_777),
            (0.782_222_222_222_222, 0.580_740_740_740_740),
            (0.410_074_074_074_074, 0.466_962_962_962_963),
            (0.759_624_691_358_025, 0.662_070_781_893_004),
        ];
        assert_eq!(result.len(), expected.len());
        for (out, (macd_value, signal_value)) in result.iter().zip(expected) {
            assert!((out.macd - macd_value).abs() < 1e-9);
            assert!((out.signal - signal_value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_macd_empty_input() {
        let macd = Macd::new(5, 10, 3).unwrap();
        assert!(macd.calculate(&[]).is_empty());
        assert_eq!(macd.calculate(&[100.0]).len(), 1);
    }

    #[test]
    fn test_macd_histogram() {
        let macd = Macd::new(3, 6, 2).unwrap();
        let data: Vec<f64> = (0..20).map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        for out in macd.calculate(&data) {
            assert!((out.histogram - (out.macd - out.signal)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_invalid_periods() {
        assert!(Macd::new(26, 12, 9).is_err());
        assert!(Macd::new(12, 12, 9).is_err());
        assert!(Macd::new(12, 26, 0).is_err());
    }
}
