//! CSV data source over real files.

use backtest_core::error::DataError;
use backtest_core::traits::PriceSource;
use backtest_data::CsvDataSource;
use chrono::NaiveDate;
use std::fs;

const AAPL: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,187.15,188.44,183.89,185.64,184.94,82488700
2024-01-03,184.22,185.88,183.43,184.25,183.55,58414500
2024-01-04,182.15,183.09,180.88,181.91,181.22,71983600
2024-01-05,181.99,182.76,180.17,181.18,180.49,62303300
2024-01-08,182.09,185.60,181.50,185.56,184.85,59144500
";

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[tokio::test]
async fn fetch_filters_inclusive_range() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("AAPL.csv"), AAPL).unwrap();

    let source = CsvDataSource::new(dir.path()).unwrap();
    let bars = source.fetch_bars("aapl", day(3), day(5)).await.unwrap();

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].date, day(3));
    assert_eq!(bars[2].date, day(5));
    assert_eq!(bars[0].close, 183.55);
    assert_eq!(source.name(), "csv");
}

#[tokio::test]
async fn raw_close_when_adjusted_not_preferred() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("aapl_daily.csv"), AAPL).unwrap();

    let source = CsvDataSource::new(dir.path())
        .unwrap()
        .with_prefer_adjusted(false);
    let bars = source.fetch_bars("AAPL", day(1), day(31)).await.unwrap();

    assert_eq!(bars.len(), 5);
    assert_eq!(bars[0].close, 185.64);
}

#[tokio::test]
async fn unknown_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvDataSource::new(dir.path()).unwrap();

    let err = source.fetch_bars("MSFT", day(1), day(31)).await.unwrap_err();
    assert!(matches!(err, DataError::SymbolNotFound(ref s) if s == "MSFT"));
}

#[tokio::test]
async fn empty_range_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    fs::write(&path, AAPL).unwrap();

    // A single file serves any symbol.
    let source = CsvDataSource::new(&path).unwrap();
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();

    assert!(matches!(
        source.fetch_bars("ANY", start, end).await,
        Err(DataError::NoDataAvailable)
    ));
}

#[tokio::test]
async fn load_all_reads_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    fs::write(&path, AAPL).unwrap();

    let bars = CsvDataSource::new(&path).unwrap().load_all("ANY").await.unwrap();
    assert_eq!(bars.len(), 5);
    assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn missing_path_is_io_error() {
    assert!(matches!(
        CsvDataSource::new("/definitely/not/here"),
        Err(DataError::Io(_))
    ));
}
