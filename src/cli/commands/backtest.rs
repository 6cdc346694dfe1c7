//! Backtest command implementation.

use anyhow::{Context, Result};
use backtest_config::{AppConfig, OutputFormat};
use backtest_core::PriceSource;
use backtest_data::CsvDataSource;
use backtest_engine::BacktestEngine;
use backtest_monitor::{show_chart, ChartData};
use backtest_strategies::StrategyRegistry;
use tracing::info;

use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config: AppConfig) -> Result<()> {
    if args.start > args.end {
        anyhow::bail!(
            "Start date {} is after end date {}",
            args.start,
            args.end
        );
    }

    let mut params = config.strategy.clone();
    args.apply_params(&mut params);
    let name = args.strategy.as_deref().unwrap_or(params.name.as_str());

    // Fail on bad parameters before touching any data
    let strategy = StrategyRegistry::new()
        .resolve(name, &params)
        .context("Invalid strategy configuration")?;
    let engine = BacktestEngine::new(strategy)
        .context("Invalid strategy configuration")?
        .with_symbol(args.ticker.clone());

    info!("Starting backtest: {} on {}", engine.config(), args.ticker);

    let data_path = args.data.clone().unwrap_or_else(|| config.data.dir.clone());
    let source = CsvDataSource::new(&data_path)
        .with_context(|| {
            format!(
                "Data path '{}' does not exist. Provide a CSV file or directory containing CSV files (e.g. --data ./data)",
                data_path.display()
            )
        })?
        .with_prefer_adjusted(config.data.prefer_adjusted && !args.raw_close);

    let bars = source
        .fetch_bars(&args.ticker, args.start, args.end)
        .await
        .with_context(|| {
            format!(
                "Failed to load prices for {} between {} and {}",
                args.ticker, args.start, args.end
            )
        })?;

    let outcome = engine.run(&bars).context("Backtest failed")?;

    match args.output.unwrap_or(config.output.format) {
        OutputFormat::Json => println!("{}", outcome.to_json()?),
        OutputFormat::Text => println!("{}", outcome.summary()),
    }

    if let Some(save_path) = &args.save {
        outcome
            .save_trades_csv(save_path)
            .with_context(|| format!("Failed to write trade log to {}", save_path.display()))?;
        info!("Trade log saved to {:?}", save_path);
    }

    if args.plot {
        show_chart(&ChartData::from_outcome(&outcome)).context("Failed to draw chart")?;
    }

    Ok(())
}
