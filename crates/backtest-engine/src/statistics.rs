//! Backtest statistics.

use backtest_core::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade log plus summary statistics over the closed trades.
///
/// An open trailing trade is listed in `trades` but is not counted in any
/// statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// All trades, oldest first; only the last may be open
    pub trades: Vec<Trade>,
    /// Number of closed trades
    pub total_trades: usize,
    /// Fraction of closed trades with positive profit, in [0, 1]
    pub win_rate: f64,
    /// Mean profit per closed trade
    pub average_profit: Decimal,
    /// Sum of realized profits
    pub cumulative_profit: Decimal,
}

impl BacktestResult {
    /// Aggregate a trade log.
    pub fn from_trades(trades: Vec<Trade>) -> Self {
        let profits: Vec<Decimal> = trades.iter().filter_map(|t| t.profit).collect();
        let total_trades = profits.len();

        if total_trades == 0 {
            return Self {
                trades,
                ..Self::empty()
            };
        }

        let winning_trades = profits.iter().filter(|p| **p > Decimal::ZERO).count();
        let total_profit: Decimal = profits.iter().sum();

        // Last realized value; an open trade carries it unchanged.
        let cumulative_profit = trades
            .iter()
            .rev()
            .find(|t| !t.is_open())
            .map(|t| t.cumulative_profit)
            .unwrap_or(total_profit);

        Self {
            win_rate: winning_trades as f64 / total_trades as f64,
            average_profit: total_profit / Decimal::from(total_trades),
            cumulative_profit,
            total_trades,
            trades,
        }
    }

    /// No trades at all.
    pub fn empty() -> Self {
        Self {
            trades: Vec::new(),
            total_trades: 0,
            win_rate: 0.0,
            average_profit: Decimal::ZERO,
            cumulative_profit: Decimal::ZERO,
        }
    }

    /// Win rate as a percentage.
    pub fn win_rate_pct(&self) -> f64 {
        self.win_rate * 100.0
    }

    pub fn winning_trades(&self) -> usize {
        self.closed_trades()
            .filter(|t| t.profit.is_some_and(|p| p > Decimal::ZERO))
            .count()
    }

    pub fn closed_trades(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter().filter(|t| !t.is_open())
    }

    /// The trailing open trade, if the position was still held at the end.
    pub fn open_trade(&self) -> Option<&Trade> {
        self.trades.last().filter(|t| t.is_open())
    }
}

impl Default for BacktestResult {
    fn default() -> Self {
        Self::empty()
    }
}
