use backtest_core::PriceBar;
use chrono::{Days, NaiveDate};

/// Consecutive daily bars starting 2024-01-01.
pub fn bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::flat(start + Days::new(i as u64), close))
        .collect()
}
