//! Terminal charts for a finished backtest.
//!
//! Displays:
//! - Close price with indicator overlays and buy/sell markers
//! - The MACD or RSI oscillator, when the strategy has one
//! - Cumulative realized profit at each sell date

use std::io;
use std::time::Duration;

use backtest_core::IndicatorValues;
use backtest_engine::BacktestOutcome;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
    Terminal,
};
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

/// One named line of `(row index, value)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }
}

/// Plot-ready data derived from a backtest outcome.
///
/// The x coordinate of every point is the row index in the indicator frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub dates: Vec<NaiveDate>,
    pub price: Series,
    /// Lines drawn on the price scale (moving averages, bands)
    pub overlays: Vec<Series>,
    /// Lines drawn on their own scale (MACD, RSI)
    pub oscillator: Vec<Series>,
    pub buys: Vec<(f64, f64)>,
    pub sells: Vec<(f64, f64)>,
    pub cumulative_profit: Vec<(f64, f64)>,
}

impl ChartData {
    pub fn from_outcome(outcome: &BacktestOutcome) -> Self {
        let frame = &outcome.frame;
        let dates = frame.dates();
        let mut price = Series::new("Close");
        let mut overlays: Vec<Series> = Vec::new();
        let mut oscillator: Vec<Series> = Vec::new();

        let names: &[&str] = match frame.first().map(|r| r.values) {
            Some(IndicatorValues::Sma { .. }) => &["SMA short", "SMA long"],
            Some(IndicatorValues::Macd { .. }) => &["MACD", "Signal"],
            Some(IndicatorValues::Rsi { .. }) => &["RSI"],
            Some(IndicatorValues::Bollinger { .. }) => &["Upper", "Middle", "Lower"],
            None => &[],
        };
        let lines: Vec<Series> = names.iter().map(|n| Series::new(*n)).collect();
        let on_price_scale = matches!(
            frame.first().map(|r| r.values),
            Some(IndicatorValues::Sma { .. } | IndicatorValues::Bollinger { .. })
        );
        if on_price_scale {
            overlays = lines;
        } else {
            oscillator = lines;
        }

        for (i, row) in frame.iter().enumerate() {
            let x = i as f64;
            price.points.push((x, row.close));

            let values: Vec<f64> = match row.values {
                IndicatorValues::Sma { short, long } => vec![short, long],
                IndicatorValues::Macd { macd, signal, .. } => vec![macd, signal],
                IndicatorValues::Rsi { rsi } => vec![rsi],
                IndicatorValues::Bollinger {
                    upper,
                    middle,
                    lower,
                } => vec![upper, middle, lower],
            };
            let target = if on_price_scale {
                &mut overlays
            } else {
                &mut oscillator
            };
            for (series, value) in target.iter_mut().zip(values) {
                series.points.push((x, value));
            }
        }

        let index_of = |date: NaiveDate| dates.binary_search(&date).ok().map(|i| i as f64);

        let mut buys = Vec::new();
        let mut sells = Vec::new();
        for signal in &outcome.signals {
            if let Some(x) = index_of(signal.date) {
                if signal.is_buy() {
                    buys.push((x, signal.price));
                } else {
                    sells.push((x, signal.price));
                }
            }
        }

        let cumulative_profit = outcome
            .result
            .closed_trades()
            .filter_map(|trade| {
                let x = index_of(trade.sell_date?)?;
                Some((x, trade.cumulative_profit.to_f64()?))
            })
            .collect();

        let title = match &outcome.symbol {
            Some(symbol) => format!("{} on {}", outcome.strategy, symbol),
            None => outcome.strategy.to_string(),
        };

        Self {
            title,
            dates,
            price,
            overlays,
            oscillator,
            buys,
            sells,
            cumulative_profit,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price.points.is_empty()
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.dates.len().saturating_sub(1).max(1) as f64]
    }

    fn x_labels(&self) -> Vec<Span<'static>> {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => {
                let mid = self.dates[self.dates.len() / 2];
                vec![
                    Span::raw(first.to_string()),
                    Span::raw(mid.to_string()),
                    Span::raw(last.to_string()),
                ]
            }
            _ => vec![],
        }
    }
}

/// Padded `[min, max]` over all points.
fn y_bounds<'a>(series: impl IntoIterator<Item = &'a [(f64, f64)]>) -> [f64; 2] {
    let (min, max) = series
        .into_iter()
        .flatten()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let range = max - min;
    let pad = if range > 0.0 {
        range * 0.05
    } else {
        max.abs().max(1.0) * 0.05
    };
    [min - pad, max + pad]
}

fn y_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        Span::raw(format!("{:.2}", bounds[0])),
        Span::raw(format!("{:.2}", mid)),
        Span::raw(format!("{:.2}", bounds[1])),
    ]
}

const OVERLAY_COLORS: [Color; 3] = [Color::Yellow, Color::Magenta, Color::Cyan];

/// Price, oscillator and cumulative-profit charts stacked vertically.
pub struct ChartView<'a> {
    data: &'a ChartData,
}

impl<'a> ChartView<'a> {
    pub fn new(data: &'a ChartData) -> Self {
        Self { data }
    }

    fn line<'d>(series: &'d Series, color: Color) -> Dataset<'d> {
        Dataset::default()
            .name(series.name.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&series.points)
    }

    fn render_price(&self, area: Rect, buf: &mut Buffer) {
        let data = self.data;
        let mut datasets = vec![Self::line(&data.price, Color::Blue)];
        for (series, color) in data.overlays.iter().zip(OVERLAY_COLORS) {
            datasets.push(Self::line(series, color));
        }
        datasets.push(
            Dataset::default()
                .name("Buy")
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Green))
                .data(&data.buys),
        );
        datasets.push(
            Dataset::default()
                .name("Sell")
                .marker(symbols::Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&data.sells),
        );

        let bounds = y_bounds(
            std::iter::once(data.price.points.as_slice())
                .chain(data.overlays.iter().map(|s| s.points.as_slice())),
        );

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(format!(
                        " {} | {} buys, {} sells ",
                        data.title,
                        data.buys.len(),
                        data.sells.len()
                    ))
                    .borders(Borders::ALL),
            )
            .x_axis(
                Axis::default()
                    .bounds(data.x_bounds())
                    .labels(data.x_labels()),
            )
            .y_axis(
                Axis::default()
                    .title("Price")
                    .bounds(bounds)
                    .labels(y_labels(bounds)),
            )
            .render(area, buf);
    }

    fn render_oscillator(&self, area: Rect, buf: &mut Buffer) {
        let data = self.data;
        let datasets: Vec<Dataset> = data
            .oscillator
            .iter()
            .zip(OVERLAY_COLORS)
            .map(|(series, color)| Self::line(series, color))
            .collect();
        let bounds = y_bounds(data.oscillator.iter().map(|s| s.points.as_slice()));
        let title = data
            .oscillator
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ");

        Chart::new(datasets)
            .block(Block::default().title(format!(" {} ", title)).borders(Borders::ALL))
            .x_axis(Axis::default().bounds(data.x_bounds()))
            .y_axis(Axis::default().bounds(bounds).labels(y_labels(bounds)))
            .render(area, buf);
    }

    fn render_profit(&self, area: Rect, buf: &mut Buffer) {
        let data = self.data;
        let block = Block::default()
            .title(" Cumulative Profit ")
            .borders(Borders::ALL);

        if data.cumulative_profit.is_empty() {
            Paragraph::new("No closed trades")
                .block(block)
                .render(area, buf);
            return;
        }

        let dataset = Dataset::default()
            .name("Cumulative Profit")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightBlue))
            .data(&data.cumulative_profit);
        let bounds = y_bounds(std::iter::once(data.cumulative_profit.as_slice()));

        Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds(data.x_bounds())
                    .labels(data.x_labels()),
            )
            .y_axis(Axis::default().bounds(bounds).labels(y_labels(bounds)))
            .render(area, buf);
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.data.is_empty() {
            Paragraph::new("Not enough data to chart")
                .block(Block::default().title(format!(" {} ", self.data.title)).borders(Borders::ALL))
                .render(area, buf);
            return;
        }

        if self.data.oscillator.is_empty() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(area);
            self.render_price(chunks[0], buf);
            self.render_profit(chunks[1], buf);
        } else {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(50),
                    Constraint::Percentage(25),
                    Constraint::Percentage(25),
                ])
                .split(area);
            self.render_price(chunks[0], buf);
            self.render_oscillator(chunks[1], buf);
            self.render_profit(chunks[2], buf);
        }
    }
}

/// Show the charts full-screen until `q`, `Esc` or Ctrl-C.
pub fn show_chart(data: &ChartData) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, data);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    data: &ChartData,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| frame.render_widget(ChartView::new(data), frame.area()))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c =
                    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) || ctrl_c {
                    debug!("Closing chart");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest_core::PriceBar;
    use backtest_engine::BacktestEngine;
    use backtest_strategies::StrategyConfig;
    use chrono::Days;
    use ratatui::backend::TestBackend;

    fn outcome(config: StrategyConfig) -> BacktestOutcome {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let closes = [10.0, 10.0, 10.0, 12.0, 12.0, 12.0, 8.0, 8.0, 8.0, 8.0, 12.0];
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::flat(start + Days::new(i as u64), c))
            .collect();
        BacktestEngine::new(config)
            .unwrap()
            .with_symbol("TEST")
            .run(&bars)
            .unwrap()
    }

    fn render(data: &ChartData) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(ChartView::new(data), frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_from_outcome_sma() {
        let data = ChartData::from_outcome(&outcome(StrategyConfig::Sma { short: 2, long: 3 }));

        assert_eq!(data.title, "SMA(2/3) on TEST");
        assert_eq!(data.price.points.len(), 9);
        assert_eq!(data.overlays.len(), 2);
        assert!(data.oscillator.is_empty());
        // Buys at rows 1 and 8, sell at row 4 (frame starts at the third bar).
        assert_eq!(data.buys, vec![(1.0, 12.0), (8.0, 12.0)]);
        assert_eq!(data.sells, vec![(4.0, 8.0)]);
        assert_eq!(data.cumulative_profit, vec![(4.0, -4.0)]);
    }

    #[test]
    fn test_from_outcome_rsi_uses_oscillator() {
        let data = ChartData::from_outcome(&outcome(StrategyConfig::Rsi {
            lower: 30.0,
            upper: 70.0,
            period: 2,
            smoothing: Default::default(),
        }));

        assert!(data.overlays.is_empty());
        assert_eq!(data.oscillator.len(), 1);
        assert_eq!(data.oscillator[0].name, "RSI");
        assert_eq!(data.oscillator[0].points.len(), data.price.points.len());
    }

    #[test]
    fn test_render_chart() {
        let data = ChartData::from_outcome(&outcome(StrategyConfig::Sma { short: 2, long: 3 }));
        let screen = render(&data);

        assert!(screen.contains("SMA(2/3) on TEST"));
        assert!(screen.contains("Cumulative Profit"));
    }

    #[test]
    fn test_render_without_data() {
        let data = ChartData::from_outcome(&outcome(StrategyConfig::Sma { short: 20, long: 50 }));
        assert!(data.is_empty());
        assert!(render(&data).contains("Not enough data to chart"));
    }
}
