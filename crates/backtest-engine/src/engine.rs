//! Backtesting engine.

use backtest_core::{validate_bars, BacktestError, IndicatorFrame, PriceBar, Signal, SignalStrategy};
use backtest_strategies::StrategyConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::simulator::simulate;
use crate::statistics::BacktestResult;

/// Everything one run produced: the indicator frame, the signals raised on
/// it and the resulting trades and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    /// Ticker the bars belong to, if known
    pub symbol: Option<String>,
    /// Strategy and parameters used
    pub strategy: StrategyConfig,
    /// Indicator frame, warm-up rows removed
    pub frame: IndicatorFrame,
    /// Signals in date order
    pub signals: Vec<Signal>,
    /// Trade log and statistics
    pub result: BacktestResult,
}

/// Backtesting engine for one strategy configuration.
///
/// Runs are pure: the same bars always give the same outcome.
pub struct BacktestEngine {
    config: StrategyConfig,
    strategy: Box<dyn SignalStrategy>,
    symbol: Option<String>,
}

impl BacktestEngine {
    /// Create a new backtest engine. Fails on invalid strategy parameters.
    pub fn new(config: StrategyConfig) -> Result<Self, BacktestError> {
        config.validate()?;
        let strategy = config.build()?;
        Ok(Self {
            config,
            strategy,
            symbol: None,
        })
    }

    /// Label outcomes with a ticker.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Bars needed before the first indicator row exists.
    pub fn lookback(&self) -> usize {
        self.strategy.lookback()
    }

    /// Run a backtest over date-ascending bars.
    pub fn run(&self, bars: &[PriceBar]) -> Result<BacktestOutcome, BacktestError> {
        validate_bars(bars)?;

        info!(
            strategy = %self.config,
            symbol = self.symbol.as_deref().unwrap_or("-"),
            bars = bars.len(),
            "Starting backtest"
        );

        if !self.strategy.has_enough_data(bars.len()) {
            warn!(
                strategy = self.strategy.name(),
                required = self.strategy.lookback() + 1,
                available = bars.len(),
                "Insufficient data for indicator, no trades generated"
            );
            return Ok(self.outcome(IndicatorFrame::empty(), Vec::new(), BacktestResult::empty()));
        }

        let frame = self.strategy.frame(bars);
        debug!(rows = frame.len(), "Indicator frame built");

        let signals = self.strategy.signals(&frame);
        let trades = simulate(&signals)?;
        let result = BacktestResult::from_trades(trades);

        info!(
            signals = signals.len(),
            total_trades = result.total_trades,
            win_rate = result.win_rate,
            cumulative_profit = %result.cumulative_profit,
            "Backtest complete"
        );

        Ok(self.outcome(frame, signals, result))
    }

    fn outcome(
        &self,
        frame: IndicatorFrame,
        signals: Vec<Signal>,
        result: BacktestResult,
    ) -> BacktestOutcome {
        BacktestOutcome {
            symbol: self.symbol.clone(),
            strategy: self.config.clone(),
            frame,
            signals,
            result,
        }
    }
}
