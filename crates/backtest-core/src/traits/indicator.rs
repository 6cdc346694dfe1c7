//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for batch technical indicators.
///
/// Indicators process a price slice and return only fully-defined values:
/// output index `0` corresponds to input index `lookback()`. Warm-up
/// positions are never filled with placeholders.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator (a scalar or a struct of lines).
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// Returns an empty vector when `data` is shorter than `min_len()`.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Number of leading inputs consumed before the first defined output.
    fn lookback(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Minimum number of inputs that yields one output.
    fn min_len(&self) -> usize {
        self.lookback() + 1
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                required: self.min_len(),
                available: data.len(),
            });
        }
        Ok(())
    }
}
