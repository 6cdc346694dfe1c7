//! CSV data source.

use async_trait::async_trait;
use backtest_core::error::DataError;
use backtest_core::traits::PriceSource;
use backtest_core::types::PriceBar;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// CSV record format.
///
/// Accepts the usual `Date,Open,High,Low,Close,Adj Close,Volume` export
/// layout as well as lowercase headers. Only the date and one of the close
/// columns are required.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open", default)]
    open: Option<f64>,
    #[serde(alias = "High", alias = "high", default)]
    high: Option<f64>,
    #[serde(alias = "Low", alias = "low", default)]
    low: Option<f64>,
    #[serde(alias = "Close", alias = "close", default)]
    close: Option<f64>,
    #[serde(
        alias = "Adj Close",
        alias = "adj_close",
        alias = "Adj_Close",
        alias = "adjclose",
        default
    )]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: Option<f64>,
}

/// CSV data source for historical daily bars.
///
/// `path` is either a single CSV file, used for every symbol, or a directory
/// holding one file per symbol.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
    prefer_adjusted: bool,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        if !path.exists() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        Ok(Self {
            path,
            prefer_adjusted: true,
        })
    }

    /// Use the adjusted close (when the file has one) as the close price.
    pub fn with_prefer_adjusted(mut self, prefer_adjusted: bool) -> Self {
        self.prefer_adjusted = prefer_adjusted;
        self
    }

    /// Locate the file holding `symbol`.
    pub fn resolve(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if self.path.is_file() {
            return Ok(self.path.clone());
        }

        let upper = symbol.to_uppercase();
        let lower = symbol.to_lowercase();
        let candidates = [
            format!("{}.csv", upper),
            format!("{}.csv", lower),
            format!("{}_daily.csv", upper),
            format!("{}_daily.csv", lower),
        ];

        candidates
            .iter()
            .map(|name| self.path.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    /// Load every bar in the file for `symbol`, sorted by date.
    pub async fn load_all(&self, symbol: &str) -> Result<Vec<PriceBar>, DataError> {
        let path = self.resolve(symbol)?;
        debug!(path = %path.display(), "Reading CSV");
        let bytes = tokio::fs::read(&path).await?;
        parse_bars(bytes.as_slice(), self.prefer_adjusted)
    }
}

#[async_trait]
impl PriceSource for CsvDataSource {
    async fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let bars: Vec<PriceBar> = self
            .load_all(symbol)
            .await?
            .into_iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        info!(
            symbol,
            %start,
            %end,
            bars = bars.len(),
            "Loaded price history"
        );
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse CSV price data into date-ascending bars.
///
/// Rows without a usable close are skipped. Duplicate dates are an error.
pub fn parse_bars<R: Read>(reader: R, prefer_adjusted: bool) -> Result<Vec<PriceBar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let date = parse_date(&record.date)?;

        let close = if prefer_adjusted {
            record.adj_close.or(record.close)
        } else {
            record.close.or(record.adj_close)
        };
        let Some(close) = close.filter(|c| c.is_finite()) else {
            debug!(%date, "Skipping row without close price");
            continue;
        };

        bars.push(PriceBar::new(
            date,
            record.open.unwrap_or(close),
            record.high.unwrap_or(close),
            record.low.unwrap_or(close),
            close,
            record.volume.unwrap_or(0.0),
        ));
    }

    // Sort by date
    bars.sort_by_key(|b| b.date);

    if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(DataError::ParseError(format!(
            "Duplicate date: {}",
            pair[1].date
        )));
    }

    Ok(bars)
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    // Timezone-stamped exports keep their local trading date.
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.date_naive());
    }

    // Try parsing as Unix timestamp
    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
