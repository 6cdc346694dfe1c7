//! Validate configuration command.

use anyhow::{Context, Result};
use backtest_config::{AppConfig, DEFAULT_CONFIG_FILE};
use std::path::Path;

pub async fn run(config: &AppConfig, config_path: Option<&Path>) -> Result<()> {
    let source = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    println!("Validating configuration: {:?}", source);

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Data: {}", config.data.dir.display());
    println!("Output: {}", config.output.format);
    println!();
    println!("Effective settings:");
    println!();
    print!("{}", config.to_toml().context("Failed to render configuration")?);

    Ok(())
}
