//! Configuration loading and typed config structures for the Bazaar simulation.
//!
//! The configuration lives in `bazaar-config.yaml` at the project root.
//! Only the run harness is configurable: the seed, pacing, run bounds,
//! logging, and the stock policy. Game rules are fixed constants in
//! [`rules`](crate::rules) and `bazaar_customers::rules`.
//!
//! Sections this module does not know about (for example the engine's
//! `autopilot` block) are ignored, so one file can serve every crate.

use std::collections::BTreeMap;
use std::path::Path;

use bazaar_customers::{ShopInventory, StockError, StockKeeper, UnlimitedStock};
use bazaar_customers::stock::DEFAULT_ITEM_LINES;
use bazaar_types::Item;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level shop configuration.
///
/// Mirrors the structure of `bazaar-config.yaml`. Every field has a
/// default, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShopConfig {
    /// World-level settings (name, seed, pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Run boundaries.
    #[serde(default)]
    pub bounds: BoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Stock policy and starting shelves.
    #[serde(default)]
    pub inventory: InventoryConfig,
}

impl ShopConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable shop name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between steps (0 runs as fast as possible).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Run boundary configuration.
///
/// A value of 0 means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BoundsConfig {
    /// Stop after this many trading days have closed (0 = unlimited).
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// Stop after this many steps (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            max_days: default_max_days(),
            max_ticks: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// How the shop's shelves behave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Shelves never run out.
    #[default]
    Unlimited,
    /// Shelves are counted and sales stop when an item runs out.
    Counted,
}

/// Stock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryConfig {
    /// Which stock keeper to build.
    #[serde(default)]
    pub policy: StockPolicy,

    /// Maximum distinct item lines on the shelves.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Units of each item on the shelves at opening (counted policy only).
    #[serde(default = "default_starting_stock")]
    pub starting_stock: BTreeMap<Item, u32>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            policy: StockPolicy::default(),
            capacity: default_capacity(),
            starting_stock: default_starting_stock(),
        }
    }
}

impl InventoryConfig {
    /// Build the stock keeper this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`StockError`] if the starting stock does not fit.
    pub fn build(&self) -> Result<Box<dyn StockKeeper>, StockError> {
        match self.policy {
            StockPolicy::Unlimited => Ok(Box::new(UnlimitedStock)),
            StockPolicy::Counted => {
                let mut inventory = ShopInventory::new(self.capacity);
                for (&item, &quantity) in &self.starting_stock {
                    inventory.add(item, quantity)?;
                }
                Ok(Box::new(inventory))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    String::from("The Midnight Bazaar")
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    33
}

const fn default_max_days() -> u32 {
    3
}

fn default_log_level() -> String {
    String::from("info")
}

const fn default_capacity() -> usize {
    DEFAULT_ITEM_LINES
}

fn default_starting_stock() -> BTreeMap<Item, u32> {
    BTreeMap::from([
        (Item::CloakingDevice, 3),
        (Item::FakeId, 5),
        (Item::QuantumDice, 2),
    ])
}
