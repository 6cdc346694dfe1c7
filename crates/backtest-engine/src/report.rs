//! Backtest report generation.

use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;

use crate::BacktestOutcome;

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

impl BacktestOutcome {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let result = &self.result;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Symbol:              {}\n",
            self.symbol.as_deref().unwrap_or("-")
        ));
        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        match (self.frame.first(), self.frame.last()) {
            (Some(first), Some(last)) => s.push_str(&format!(
                "  Period:              {} to {} ({} rows)\n",
                first.date,
                last.date,
                self.frame.len()
            )),
            _ => s.push_str("  Period:              insufficient data\n"),
        }
        s.push_str(&format!("  Signals:             {}\n", self.signals.len()));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Total Trades:        {}\n",
            result.total_trades
        ));
        s.push_str(&format!(
            "  Winning Trades:      {}\n",
            result.winning_trades()
        ));
        s.push_str(&format!(
            "  Win Rate:            {:.2}%\n",
            result.win_rate_pct()
        ));
        s.push_str(&format!(
            "  Average Profit:      {}\n",
            money(result.average_profit)
        ));
        s.push_str(&format!(
            "  Cumulative Profit:   {}\n",
            money(result.cumulative_profit)
        ));
        if let Some(open) = result.open_trade() {
            s.push_str(&format!(
                "  Open Position:       since {} at {}\n",
                open.buy_date,
                money(open.buy_price)
            ));
        }
        s.push('\n');

        if !result.trades.is_empty() {
            s.push_str("TRADES\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            s.push_str("  Buy Date    Buy      Sell Date   Sell     Profit   Cum.     Days\n");
            for trade in &result.trades {
                s.push_str(&format!(
                    "  {}  {:<8} {:<10}  {:<8} {:<8} {:<8} {}\n",
                    trade.buy_date,
                    money(trade.buy_price),
                    trade
                        .sell_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "open".to_string()),
                    trade.sell_price.map(money).unwrap_or_default(),
                    trade.profit.map(money).unwrap_or_default(),
                    money(trade.cumulative_profit),
                    trade
                        .holding_days()
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                ));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the trade log as CSV. Open-trade sell fields are empty cells.
    pub fn write_trades_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for trade in &self.result.trades {
            wtr.serialize(trade)?;
        }
        if self.result.trades.is_empty() {
            wtr.write_record([
                "buy_date",
                "buy_price",
                "sell_date",
                "sell_price",
                "profit",
                "cumulative_profit",
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Export the trade log to a CSV string.
    pub fn trades_to_csv(&self) -> Result<String, csv::Error> {
        let mut buf = Vec::new();
        self.write_trades_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Save the trade log to a CSV file.
    pub fn save_trades_csv(&self, path: impl AsRef<Path>) -> Result<(), csv::Error> {
        let file = std::fs::File::create(path)?;
        self.write_trades_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BacktestOutcome, BacktestResult};
    use backtest_core::{IndicatorFrame, Trade};
    use backtest_strategies::StrategyConfig;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn outcome(trades: Vec<Trade>) -> BacktestOutcome {
        BacktestOutcome {
            symbol: Some("AAPL".to_string()),
            strategy: StrategyConfig::default(),
            frame: IndicatorFrame::empty(),
            signals: vec![],
            result: BacktestResult::from_trades(trades),
        }
    }

    fn sample_trades() -> Vec<Trade> {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let mut first = Trade::open(d(1, 2), dec!(100), dec!(0));
        first.close(d(2, 1), dec!(112.5));
        let open = Trade::open(d(3, 4), dec!(105), first.cumulative_profit);
        vec![first, open]
    }

    #[test]
    fn test_report_summary() {
        let summary = outcome(sample_trades()).summary();
        assert!(summary.contains("AAPL"));
        assert!(summary.contains("SMA(20/50)"));
        assert!(summary.contains("Total Trades:        1"));
        assert!(summary.contains("100.00%"));
        assert!(summary.contains("12.50"));
        assert!(summary.contains("open"));
    }

    #[test]
    fn test_summary_without_data() {
        let summary = outcome(vec![]).summary();
        assert!(summary.contains("insufficient data"));
        assert!(!summary.contains("TRADES"));
    }

    #[test]
    fn test_trades_csv_open_trade_has_empty_cells() {
        let csv = outcome(sample_trades()).trades_to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "buy_date,buy_price,sell_date,sell_price,profit,cumulative_profit"
        );
        assert_eq!(lines[1], "2024-01-02,100,2024-02-01,112.5,12.5,12.5");
        assert_eq!(lines[2], "2024-03-04,105,,,,12.5");
    }

    #[test]
    fn test_trades_csv_header_only_when_empty() {
        let csv = outcome(vec![]).trades_to_csv().unwrap();
        assert_eq!(
            csv.trim_end(),
            "buy_date,buy_price,sell_date,sell_price,profit,cumulative_profit"
        );
    }

    #[test]
    fn test_save_trades_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        outcome(sample_trades()).save_trades_csv(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[test]
    fn test_json_is_stable() {
        let outcome = outcome(sample_trades());
        let a = outcome.to_json().unwrap();
        let b = outcome.to_json().unwrap();
        assert_eq!(a, b);

        let parsed: BacktestOutcome = serde_json::from_str(&a).unwrap();
        assert_eq!(parsed, outcome);
    }
}
