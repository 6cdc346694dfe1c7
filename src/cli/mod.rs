//! CLI definitions.

pub mod commands;

use backtest_config::OutputFormat;
use backtest_strategies::{RsiSmoothing, StrategyParams};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "backtest")]
#[command(author, version, about = "Single-asset strategy backtester")]
pub struct Cli {
    /// Configuration file path (defaults to ./backtest.toml when present)
    #[arg(short, long, env = "BACKTEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtest over historical prices
    Backtest(BacktestArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration and print the effective settings
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SmoothingArg {
    Simple,
    Wilder,
}

impl From<SmoothingArg> for RsiSmoothing {
    fn from(arg: SmoothingArg) -> Self {
        match arg {
            SmoothingArg::Simple => RsiSmoothing::Simple,
            SmoothingArg::Wilder => RsiSmoothing::Wilder,
        }
    }
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Ticker symbol to backtest
    #[arg(short, long)]
    pub ticker: String,

    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Strategy: sma, macd, rsi or bollinger (defaults to the configured one)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Short SMA window
    #[arg(long)]
    pub sma_short: Option<usize>,

    /// Long SMA window
    #[arg(long)]
    pub sma_long: Option<usize>,

    /// MACD fast EMA period
    #[arg(long)]
    pub macd_fast: Option<usize>,

    /// MACD slow EMA period
    #[arg(long)]
    pub macd_slow: Option<usize>,

    /// MACD signal EMA period
    #[arg(long)]
    pub macd_signal: Option<usize>,

    /// RSI oversold threshold
    #[arg(long)]
    pub rsi_lower: Option<f64>,

    /// RSI overbought threshold
    #[arg(long)]
    pub rsi_upper: Option<f64>,

    /// RSI period
    #[arg(long)]
    pub rsi_period: Option<usize>,

    /// RSI smoothing
    #[arg(long)]
    pub rsi_smoothing: Option<SmoothingArg>,

    /// Bollinger window
    #[arg(long)]
    pub bb_window: Option<usize>,

    /// Bollinger band width in standard deviations
    #[arg(long)]
    pub bb_std: Option<f64>,

    /// CSV file, or directory of {SYMBOL}.csv files
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Use the raw close even when the data has an adjusted close
    #[arg(long)]
    pub raw_close: bool,

    /// Output format (text, json)
    #[arg(long)]
    pub output: Option<OutputFormat>,

    /// Save the trade log as CSV
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Show price, indicator and profit charts in the terminal
    #[arg(long)]
    pub plot: bool,
}

impl BacktestArgs {
    /// Apply per-parameter flags on top of configured values.
    pub fn apply_params(&self, params: &mut StrategyParams) {
        fn set<T: Copy>(target: &mut T, flag: Option<T>) {
            if let Some(value) = flag {
                *target = value;
            }
        }

        set(&mut params.sma_short, self.sma_short);
        set(&mut params.sma_long, self.sma_long);
        set(&mut params.macd_fast, self.macd_fast);
        set(&mut params.macd_slow, self.macd_slow);
        set(&mut params.macd_signal, self.macd_signal);
        set(&mut params.rsi_lower, self.rsi_lower);
        set(&mut params.rsi_upper, self.rsi_upper);
        set(&mut params.rsi_period, self.rsi_period);
        set(&mut params.rsi_smoothing, self.rsi_smoothing.map(Into::into));
        set(&mut params.bb_window, self.bb_window);
        set(&mut params.bb_std, self.bb_std);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_backtest() {
        let cli = Cli::try_parse_from([
            "backtest",
            "--log-level",
            "debug",
            "backtest",
            "--ticker",
            "AAPL",
            "--start",
            "2020-01-01",
            "--end",
            "2023-12-31",
            "--strategy",
            "RSI",
            "--rsi-lower",
            "25",
            "--rsi-smoothing",
            "wilder",
            "--output",
            "json",
        ])
        .unwrap();

        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest command");
        };
        assert_eq!(args.ticker, "AAPL");
        assert_eq!(args.strategy.as_deref(), Some("RSI"));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(args.output, Some(OutputFormat::Json));

        let mut params = StrategyParams::default();
        args.apply_params(&mut params);
        assert_eq!(params.rsi_lower, 25.0);
        assert_eq!(params.rsi_upper, 70.0);
        assert_eq!(params.rsi_smoothing, RsiSmoothing::Wilder);
    }

    #[test]
    fn test_strategy_is_optional() {
        let cli = Cli::try_parse_from([
            "backtest", "backtest", "--ticker", "X", "--start", "2020-01-01", "--end",
            "2020-12-31",
        ])
        .unwrap();

        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest command");
        };
        assert!(args.strategy.is_none());
        assert!(!args.plot);
    }

    #[test]
    fn test_bad_date_rejected() {
        let result = Cli::try_parse_from([
            "backtest", "backtest", "--ticker", "X", "--start", "2020-13-01", "--end",
            "2020-12-31",
        ]);
        assert!(result.is_err());
    }
}
