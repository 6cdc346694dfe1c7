//! Day-over-day edge detection shared by all strategies.

use backtest_core::{IndicatorFrame, IndicatorRow, Signal, SignalKind};
use tracing::debug;

/// Fast line crossing the slow line.
///
/// Equality on either day counts as "not yet crossed", so touching and
/// separating again raises a single signal on the separating day.
pub fn crossover(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64) -> Option<SignalKind> {
    if prev_fast <= prev_slow && fast > slow {
        Some(SignalKind::Buy)
    } else if prev_fast >= prev_slow && fast < slow {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

/// A value leaving the `[lower, upper]` band.
///
/// BUY on the day it first drops below `lower`, SELL on the day it first
/// rises above `upper`. Band edges may move from one day to the next.
pub fn band_exit(
    prev: f64,
    prev_band: (f64, f64),
    value: f64,
    band: (f64, f64),
) -> Option<SignalKind> {
    let (prev_lower, prev_upper) = prev_band;
    let (lower, upper) = band;

    if prev >= prev_lower && value < lower {
        Some(SignalKind::Buy)
    } else if prev <= prev_upper && value > upper {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

/// Walk consecutive frame rows and emit a signal wherever `detect` fires.
///
/// Signals carry the current row's date and close, so they inherit the
/// frame's strictly ascending dates and there is at most one per date.
pub(crate) fn scan<F>(strategy: &str, frame: &IndicatorFrame, detect: F) -> Vec<Signal>
where
    F: Fn(&IndicatorRow, &IndicatorRow) -> Option<SignalKind>,
{
    frame
        .pairs()
        .filter_map(|(prev, cur)| {
            detect(prev, cur).map(|kind| {
                debug!(strategy, date = %cur.date, %kind, price = cur.close, "Signal");
                Signal {
                    date: cur.date,
                    kind,
                    price: cur.close,
                }
            })
        })
        .collect()
}
