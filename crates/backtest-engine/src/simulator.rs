//! Trade simulator: turns signals into non-overlapping long round trips.

use backtest_core::{BacktestError, Signal, SignalKind, Trade};
use rust_decimal::Decimal;
use tracing::debug;

/// Position held between signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Flat,
    Long,
}

/// Convert an execution price to money.
fn to_money(price: f64) -> Result<Decimal, BacktestError> {
    Decimal::try_from(price)
        .map_err(|e| BacktestError::InvalidInput(format!("Unrepresentable price {}: {}", price, e)))
}

/// Replay `signals` (date-ascending) through a FLAT/LONG state machine.
///
/// Fills happen at the signal's close on the signal's date. BUY while LONG
/// and SELL while FLAT are dropped. A position still open after the last
/// signal stays in the output as an open trade.
pub fn simulate(signals: &[Signal]) -> Result<Vec<Trade>, BacktestError> {
    let mut trades: Vec<Trade> = Vec::new();
    let mut position = Position::Flat;
    let mut realized = Decimal::ZERO;

    for signal in signals {
        position = match (position, signal.kind) {
            (Position::Flat, SignalKind::Buy) => {
                trades.push(Trade::open(signal.date, to_money(signal.price)?, realized));
                Position::Long
            }
            (Position::Long, SignalKind::Sell) => {
                let price = to_money(signal.price)?;
                // Long always has an open trade on top.
                if let Some(trade) = trades.last_mut() {
                    trade.close(signal.date, price);
                    realized = trade.cumulative_profit;
                }
                Position::Flat
            }
            (state, kind) => {
                debug!(date = %signal.date, %kind, ?state, "Ignoring signal");
                state
            }
        };
    }

    if position == Position::Long {
        debug!("Position still open at end of data");
    }

    Ok(trades)
}
