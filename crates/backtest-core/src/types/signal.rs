//! Trading signals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    /// Open a long position
    Buy,
    /// Close the long position
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
        }
    }
}

/// A discrete buy/sell event raised on one trading date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Date the signal fires (and executes)
    pub date: NaiveDate,
    /// Buy or sell
    pub kind: SignalKind,
    /// Close price on `date`
    pub price: f64,
}

impl Signal {
    pub fn buy(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            kind: SignalKind::Buy,
            price,
        }
    }

    pub fn sell(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            kind: SignalKind::Sell,
            price,
        }
    }

    #[inline]
    pub fn is_buy(&self) -> bool {
        self.kind == SignalKind::Buy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind_serde() {
        let json = serde_json::to_string(&SignalKind::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");
        assert_eq!(SignalKind::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_constructors() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(Signal::buy(date, 10.0).is_buy());
        assert!(!Signal::sell(date, 10.0).is_buy());
    }
}
