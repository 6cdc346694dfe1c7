//! Historical price data sources.

mod csv_source;

pub use csv_source::{parse_bars, CsvDataSource};
