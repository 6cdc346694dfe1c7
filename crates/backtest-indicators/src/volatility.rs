//! Volatility indicators.

use backtest_core::error::IndicatorError;
use backtest_core::traits::Indicator;
use serde::{Deserialize, Serialize};

use crate::moving_average::Sma;
use crate::simd::{mean_simd, sum_sq_dev_simd};

/// Rolling sample standard deviation (n - 1 denominator).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "Standard deviation period must be at least 2".into(),
            ));
        }
        Ok(Self { period })
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if data.len() < self.min_len() {
            return vec![];
        }

        let denominator = (self.period - 1) as f64;

        data.windows(self.period)
            .map(|window| {
                let mean = mean_simd(window);
                (sum_sq_dev_simd(window, mean) / denominator).sqrt()
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    sma: Sma,
    std_dev: StdDev,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create Bollinger Bands with custom parameters.
    pub fn new(period: usize, std_dev_multiplier: f64) -> Result<Self, IndicatorError> {
        if !std_dev_multiplier.is_finite() || std_dev_multiplier <= 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "Std dev multiplier must be positive, got {}",
                std_dev_multiplier
            )));
        }
        Ok(Self {
            sma: Sma::new(period)?,
            std_dev: StdDev::new(period)?,
            std_dev_multiplier,
        })
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if data.len() < self.min_len() {
            return vec![];
        }

        self.sma
            .calculate(data)
            .into_iter()
            .zip(self.std_dev.calculate(data))
            .map(|(middle, std_dev)| BollingerOutput {
                upper: middle + self.std_dev_multiplier * std_dev,
                middle,
                lower: middle - self.std_dev_multiplier * std_dev,
            })
            .collect()
    }

    fn lookback(&self) -> usize {
        self.std_dev.lookback()
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_dev() {
        let std_dev = StdDev::new(3).unwrap();
        let data = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let result = std_dev.calculate(&data);

        assert_eq!(result.len(), 3);
        // First window: [2, 4, 6], mean = 4, sample variance = (4+0+4)/2 = 4
        assert!((result[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_std_dev_period_too_small() {
        assert!(StdDev::new(1).is_err());
    }

    #[test]
    fn test_bollinger_bands() {
        let bb = BollingerBands::new(20, 2.0).unwrap();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let result = bb.calculate(&data);
        assert_eq!(result.len(), 11);

        for output in &result {
            // Upper > Middle > Lower
            assert!(output.upper > output.middle);
            assert!(output.middle > output.lower);
        }
    }

    #[test]
    fn test_bollinger_band_width() {
        let bb = BollingerBands::new(3, 1.5).unwrap();
        let result = bb.calculate(&[2.0, 4.0, 6.0]);

        assert_eq!(result.len(), 1);
        assert!((result[0].middle - 4.0).abs() < 1e-10);
        assert!((result[0].upper - 7.0).abs() < 1e-10);
        assert!((result[0].lower - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_bollinger_constant_price() {
        let bb = BollingerBands::new(5, 2.0).unwrap();
        let result = bb.calculate(&[100.0; 5]);

        assert_eq!(result.len(), 1);
        // With constant price, bands collapse onto the price
        assert_eq!(result[0].upper, 100.0);
        assert_eq!(result[0].lower, 100.0);
        assert_eq!(result[0].middle, 100.0);
    }

    #[test]
    fn test_bollinger_invalid_params() {
        assert!(BollingerBands::new(20, 0.0).is_err());
        assert!(BollingerBands::new(20, f64::NAN).is_err());
        assert!(BollingerBands::new(1, 2.0).is_err());
    }
}
