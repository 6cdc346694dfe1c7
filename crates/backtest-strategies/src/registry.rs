//! Strategy registry for selecting strategies by name.

use crate::{StrategyConfig, StrategyKind, StrategyParams};
use backtest_core::BacktestError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Selector accepted on the command line
    pub key: StrategyKind,
    /// Strategy name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the built-in strategies.
pub struct StrategyRegistry {
    strategies: HashMap<StrategyKind, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = HashMap::new();

        let mut register = |key: StrategyKind, name: &str, description: &str| {
            strategies.insert(
                key,
                StrategyInfo {
                    key,
                    name: name.to_string(),
                    description: description.to_string(),
                    default_config: serde_json::to_value(StrategyConfig::default_for(key))
                        .unwrap_or_default(),
                },
            );
        };

        register(
            StrategyKind::Sma,
            "SMA Crossover",
            "Buys when the short SMA crosses above the long SMA, sells on the cross back below",
        );
        register(
            StrategyKind::Macd,
            "MACD",
            "Buys when the MACD line crosses above its signal line, sells on the cross back below",
        );
        register(
            StrategyKind::Rsi,
            "RSI",
            "Buys when RSI drops below the lower threshold, sells when it rises above the upper",
        );
        register(
            StrategyKind::Bollinger,
            "Bollinger Bands",
            "Buys when the close breaks below the lower band, sells when it breaks above the upper",
        );

        Self { strategies }
    }

    /// List all available strategies, ordered by selector.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        let mut list: Vec<_> = self.strategies.values().collect();
        list.sort_by_key(|info| info.key);
        list
    }

    /// Get strategy info by selector (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        let kind = name.parse::<StrategyKind>().ok()?;
        self.strategies.get(&kind)
    }

    /// Resolve a selector to a validated configuration built from `params`.
    pub fn resolve(
        &self,
        name: &str,
        params: &StrategyParams,
    ) -> Result<StrategyConfig, BacktestError> {
        let info = self
            .get(name)
            .ok_or_else(|| BacktestError::UnknownStrategy(name.to_string()))?;

        let config = StrategyConfig::from_params(info.key, params);
        config.validate()?;
        Ok(config)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backtest_core::SignalStrategy;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let strategies = registry.list();

        assert_eq!(strategies.len(), 4);
        assert_eq!(strategies[0].key, StrategyKind::Sma);
        assert_eq!(strategies[3].key, StrategyKind::Bollinger);
    }

    #[test]
    fn test_registry_get() {
        let registry = StrategyRegistry::new();

        assert!(registry.get("sma").is_some());
        assert!(registry.get("BB").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_default_configs_deserialize() {
        let registry = StrategyRegistry::new();

        for info in registry.list() {
            let config: StrategyConfig =
                serde_json::from_value(info.default_config.clone()).unwrap();
            assert_eq!(config.kind(), info.key);
            assert_eq!(config.build().unwrap().name(), info.name);
        }
    }

    #[test]
    fn test_resolve() {
        let registry = StrategyRegistry::new();
        let params = StrategyParams {
            bb_window: 10,
            ..Default::default()
        };

        assert_eq!(
            registry.resolve("Bollinger", &params).unwrap(),
            StrategyConfig::Bollinger {
                window: 10,
                num_std: 2.0
            }
        );
        // The configured name does not override an explicit selector.
        assert_eq!(
            registry.resolve("sma", &params).unwrap(),
            StrategyConfig::Sma { short: 20, long: 50 }
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_and_invalid() {
        let registry = StrategyRegistry::new();

        assert!(matches!(
            registry.resolve("ichimoku", &StrategyParams::default()),
            Err(BacktestError::UnknownStrategy(_))
        ));

        let params = StrategyParams {
            rsi_lower: 80.0,
            ..Default::default()
        };
        assert!(matches!(
            registry.resolve("rsi", &params),
            Err(BacktestError::InvalidParameter(_))
        ));
    }
}
