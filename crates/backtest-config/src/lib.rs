//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `BACKTEST__SECTION__KEY` environment variables. Command-line flags are
//! applied on top by the binary.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig, OutputFormat, OutputSettings};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "backtest.toml";

/// Load configuration from file and environment.
///
/// An explicit `path` must exist; otherwise `backtest.toml` is used if
/// present and defaults apply if not.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("BACKTEST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
