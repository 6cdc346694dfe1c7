//! Strategy backtester CLI application.

mod cli;

use anyhow::{Context, Result};
use backtest_config::load_config;
use backtest_monitor::setup_logging;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level.as_str().to_string();
    }
    if cli.json_logs {
        config.logging.format = "json".to_string();
    }

    // Setup logging; the guard flushes the log file on exit
    let _guard = setup_logging(
        &config.logging.level,
        config.logging.is_json(),
        config.logging.file.as_deref(),
    );

    // Execute command
    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, config).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::ValidateConfig => {
            cli::commands::validate::run(&config, cli.config.as_deref()).await
        }
    }
}
