//! Round-trip trade records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One long round trip: bought at `buy_price`, optionally sold.
///
/// A trade with no sell fields is still open. `cumulative_profit` is the
/// running sum of realized profits up to and including this trade; an open
/// trade carries the previous realized value unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub buy_date: NaiveDate,
    pub buy_price: Decimal,
    pub sell_date: Option<NaiveDate>,
    pub sell_price: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub cumulative_profit: Decimal,
}

impl Trade {
    /// Open a new trade on `date` at `price`.
    pub fn open(date: NaiveDate, price: Decimal, realized_so_far: Decimal) -> Self {
        Self {
            buy_date: date,
            buy_price: price,
            sell_date: None,
            sell_price: None,
            profit: None,
            cumulative_profit: realized_so_far,
        }
    }

    /// Close the trade and return the realized profit.
    pub fn close(&mut self, date: NaiveDate, price: Decimal) -> Decimal {
        let profit = price - self.buy_price;
        self.sell_date = Some(date);
        self.sell_price = Some(price);
        self.profit = Some(profit);
        self.cumulative_profit += profit;
        profit
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.sell_date.is_none()
    }

    /// Calendar days held, if closed.
    pub fn holding_days(&self) -> Option<i64> {
        self.sell_date
            .map(|sell| (sell - self.buy_date).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_then_close() {
        let buy = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let sell = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();

        let mut trade = Trade::open(buy, dec!(100), dec!(5));
        assert!(trade.is_open());
        assert_eq!(trade.cumulative_profit, dec!(5));
        assert!(trade.holding_days().is_none());

        let profit = trade.close(sell, dec!(97.5));
        assert_eq!(profit, dec!(-2.5));
        assert!(!trade.is_open());
        assert_eq!(trade.profit, Some(dec!(-2.5)));
        assert_eq!(trade.cumulative_profit, dec!(2.5));
        assert_eq!(trade.holding_days(), Some(10));
    }
}
