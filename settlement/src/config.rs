//! Configuration for settlement engine

use crate::{ledger::DEFAULT_SCALE, settler::DEFAULT_SEARCH_LIMIT};
use serde::{Deserialize, Serialize};

/// Largest search limit accepted; 12 participants already means up to 6!·6! orderings
pub const MAX_SEARCH_LIMIT: usize = 12;

/// Largest scale `rust_decimal` can represent
pub const MAX_SCALE: u32 = 28;

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name, tagged on every settlement log line
    pub service_name: String,

    /// Search configuration
    pub search: SearchConfig,

    /// Ledger configuration
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settlement-engine".to_string(),
            search: SearchConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

/// Exhaustive search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum creditors + debtors searched exhaustively.
    /// Larger groups get the greedy result.
    pub limit: usize,

    /// Stop at the first ordering that reaches the move-count lower bound
    pub early_exit: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            early_exit: true,
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Decimal places balances are reported at
    pub scale: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(limit) = std::env::var("SETTLEMENT_SEARCH_LIMIT") {
            config.search.limit = limit.parse().map_err(|e| {
                crate::Error::Config(format!("SETTLEMENT_SEARCH_LIMIT: {}", e))
            })?;
        }

        if let Ok(early_exit) = std::env::var("SETTLEMENT_EARLY_EXIT") {
            config.search.early_exit = early_exit.parse().map_err(|e| {
                crate::Error::Config(format!("SETTLEMENT_EARLY_EXIT: {}", e))
            })?;
        }

        if let Ok(scale) = std::env::var("SETTLEMENT_LEDGER_SCALE") {
            config.ledger.scale = scale.parse().map_err(|e| {
                crate::Error::Config(format!("SETTLEMENT_LEDGER_SCALE: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check limits
    pub fn validate(&self) -> crate::Result<()> {
        if self.search.limit > MAX_SEARCH_LIMIT {
            return Err(crate::Error::Config(format!(
                "search limit {} exceeds maximum {}",
                self.search.limit, MAX_SEARCH_LIMIT
            )));
        }

        if self.ledger.scale > MAX_SCALE {
            return Err(crate::Error::Config(format!(
                "ledger scale {} exceeds maximum {}",
                self.ledger.scale, MAX_SCALE
            )));
        }

        Ok(())
    }
}
