//! Signal strategy trait definition.

use crate::error::BacktestError;
use crate::types::{IndicatorFrame, PriceBar, Signal};

/// A strategy turns price bars into an indicator frame, and the frame into
/// discrete buy/sell signals.
///
/// Implementations are pure: the same bars always give the same frame and
/// the same signals.
pub trait SignalStrategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Check the strategy parameters.
    fn validate(&self) -> Result<(), BacktestError>;

    /// Number of leading bars with an undefined indicator value.
    fn lookback(&self) -> usize;

    /// Compute the indicator frame, warm-up rows removed.
    ///
    /// Returns an empty frame when there are not more than `lookback()` bars.
    fn frame(&self, bars: &[PriceBar]) -> IndicatorFrame;

    /// Derive signals from consecutive frame rows.
    ///
    /// Signals are strictly date-ascending, at most one per date, and the
    /// first frame row never signals.
    fn signals(&self, frame: &IndicatorFrame) -> Vec<Signal>;

    /// Check if there are enough bars to produce at least one indicator row.
    fn has_enough_data(&self, bars_available: usize) -> bool {
        bars_available > self.lookback()
    }
}
