//! Core traits for the backtester.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::PriceSource;
pub use indicator::Indicator;
pub use strategy::SignalStrategy;
