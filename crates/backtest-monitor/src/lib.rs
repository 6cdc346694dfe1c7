//! Logging setup and terminal charts.

mod chart;
mod logging;

pub use chart::{show_chart, ChartData, ChartView, Series};
pub use logging::setup_logging;
