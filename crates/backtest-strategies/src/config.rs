//! Strategy selection and parameters.

use std::fmt;
use std::str::FromStr;

use backtest_core::{BacktestError, SignalStrategy};
use backtest_indicators::RsiSmoothing;
use serde::{Deserialize, Serialize};

use crate::{BollingerStrategy, MacdStrategy, RsiStrategy, SmaCrossoverStrategy};

/// The four supported strategy families.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Sma,
    Macd,
    Rsi,
    Bollinger,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sma,
        StrategyKind::Macd,
        StrategyKind::Rsi,
        StrategyKind::Bollinger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Sma => "sma",
            StrategyKind::Macd => "macd",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Bollinger => "bollinger",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(StrategyKind::Sma),
            "macd" => Ok(StrategyKind::Macd),
            "rsi" => Ok(StrategyKind::Rsi),
            "bollinger" | "bb" => Ok(StrategyKind::Bollinger),
            _ => Err(BacktestError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Flat parameter set for every strategy, as read from config files and
/// command-line flags. Only the fields of the selected strategy are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Strategy run when none is named on the command line
    pub name: StrategyKind,
    pub sma_short: usize,
    pub sma_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub rsi_period: usize,
    pub rsi_smoothing: RsiSmoothing,
    pub bb_window: usize,
    pub bb_std: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            name: StrategyKind::Sma,
            sma_short: 20,
            sma_long: 50,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_lower: 30.0,
            rsi_upper: 70.0,
            rsi_period: 14,
            rsi_smoothing: RsiSmoothing::Simple,
            bb_window: 20,
            bb_std: 2.0,
        }
    }
}

impl StrategyParams {
    /// Configuration of the selected strategy.
    pub fn selected(&self) -> StrategyConfig {
        StrategyConfig::from_params(self.name, self)
    }
}

/// A fully-specified strategy: which family, with which parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum StrategyConfig {
    Sma {
        short: usize,
        long: usize,
    },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Rsi {
        lower: f64,
        upper: f64,
        period: usize,
        #[serde(default)]
        smoothing: RsiSmoothing,
    },
    Bollinger {
        window: usize,
        num_std: f64,
    },
}

impl StrategyConfig {
    /// Pick the parameters for `kind` out of the flat set.
    pub fn from_params(kind: StrategyKind, params: &StrategyParams) -> Self {
        match kind {
            StrategyKind::Sma => StrategyConfig::Sma {
                short: params.sma_short,
                long: params.sma_long,
            },
            StrategyKind::Macd => StrategyConfig::Macd {
                fast: params.macd_fast,
                slow: params.macd_slow,
                signal: params.macd_signal,
            },
            StrategyKind::Rsi => StrategyConfig::Rsi {
                lower: params.rsi_lower,
                upper: params.rsi_upper,
                period: params.rsi_period,
                smoothing: params.rsi_smoothing,
            },
            StrategyKind::Bollinger => StrategyConfig::Bollinger {
                window: params.bb_window,
                num_std: params.bb_std,
            },
        }
    }

    /// Default parameters for `kind`.
    pub fn default_for(kind: StrategyKind) -> Self {
        Self::from_params(kind, &StrategyParams::default())
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::Sma { .. } => StrategyKind::Sma,
            StrategyConfig::Macd { .. } => StrategyKind::Macd,
            StrategyConfig::Rsi { .. } => StrategyKind::Rsi,
            StrategyConfig::Bollinger { .. } => StrategyKind::Bollinger,
        }
    }

    /// Check parameters without building anything.
    pub fn validate(&self) -> Result<(), BacktestError> {
        match *self {
            StrategyConfig::Sma { short, long } => SmaCrossoverStrategy::check_params(short, long),
            StrategyConfig::Macd { fast, slow, signal } => {
                MacdStrategy::check_params(fast, slow, signal)
            }
            StrategyConfig::Rsi {
                lower,
                upper,
                period,
                ..
            } => RsiStrategy::check_params(lower, upper, period),
            StrategyConfig::Bollinger { window, num_std } => {
                BollingerStrategy::check_params(window, num_std)
            }
        }
    }

    /// Build the strategy. Fails on invalid parameters.
    pub fn build(&self) -> Result<Box<dyn SignalStrategy>, BacktestError> {
        let strategy: Box<dyn SignalStrategy> = match *self {
            StrategyConfig::Sma { short, long } => Box::new(SmaCrossoverStrategy::new(short, long)?),
            StrategyConfig::Macd { fast, slow, signal } => {
                Box::new(MacdStrategy::new(fast, slow, signal)?)
            }
            StrategyConfig::Rsi {
                lower,
                upper,
                period,
                smoothing,
            } => Box::new(RsiStrategy::new(lower, upper, period, smoothing)?),
            StrategyConfig::Bollinger { window, num_std } => {
                Box::new(BollingerStrategy::new(window, num_std)?)
            }
        };
        Ok(strategy)
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::default_for(StrategyKind::Sma)
    }
}

impl fmt::Display for StrategyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyConfig::Sma { short, long } => write!(f, "SMA({}/{})", short, long),
            StrategyConfig::Macd { fast, slow, signal } => {
                write!(f, "MACD({}/{}/{})", fast, slow, signal)
            }
            StrategyConfig::Rsi {
                lower,
                upper,
                period,
                smoothing,
            } => write!(f, "RSI({}, {}/{}, {:?})", period, lower, upper, smoothing),
            StrategyConfig::Bollinger { window, num_std } => {
                write!(f, "Bollinger({}, {}σ)", window, num_std)
            }
        }
    }
}
