//! Headless shop binary for the Bazaar simulation.
//!
//! This is the main entry point that wires together the shop state, the
//! autopilot shopkeeper, and the run loop. It loads configuration,
//! initializes logging, and runs the shop until a bound is reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `bazaar-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the shop state (seeded RNG, shelves)
//! 4. Create the autopilot input source
//! 5. Run the shop loop
//! 6. Log the result

mod autopilot;
mod error;
mod log_callback;

use std::path::Path;

use bazaar_core::config::ShopConfig;
use bazaar_core::runner::{self, RunBounds};
use bazaar_core::tick::ShopState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::autopilot::{Autopilot, AutopilotConfig};
use crate::error::EngineError;
use crate::log_callback::LogCallback;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "bazaar-config.yaml";

/// Application entry point for the shop binary.
///
/// # Errors
///
/// Returns an error if any initialization step or the run itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_found = Path::new(CONFIG_PATH).exists();
    let config = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("bazaar-engine starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        shop_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        stock_policy = ?config.inventory.policy,
        "Configuration loaded"
    );

    // 3. Build the shop.
    let mut state = ShopState::from_config(&config)?;
    info!(day = state.clock.day(), "Shop state assembled");

    // 4. Create the autopilot.
    let autopilot_config = load_autopilot_config()?;
    info!(
        miss_chance = autopilot_config.miss_chance,
        reaction_ticks = autopilot_config.reaction_ticks,
        "Autopilot configured"
    );
    let mut input = Autopilot::new(autopilot_config, config.world.seed.wrapping_add(1));

    // 5. Run the shop.
    let bounds = RunBounds::from_config(&config);
    let mut callback = LogCallback::new();
    let result = runner::run_shop(&mut state, &mut input, &bounds, &mut callback).await?;

    // 6. Log results.
    runner::log_run_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        sales = callback.sales(),
        haggles_lost = callback.haggles_lost(),
        "bazaar-engine shutdown complete"
    );

    Ok(())
}

/// Load the shop configuration from `bazaar-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
fn load_config() -> Result<ShopConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = ShopConfig::from_file(config_path)?;
        Ok(config)
    } else {
        Ok(ShopConfig::default())
    }
}

/// Load the autopilot configuration from `bazaar-config.yaml`.
///
/// Reads the `autopilot` section from the YAML config file. If the file
/// does not exist or lacks the `autopilot` key, defaults are used.
fn load_autopilot_config() -> Result<AutopilotConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if !config_path.exists() {
        return Ok(AutopilotConfig::default());
    }
    let contents = std::fs::read_to_string(config_path).map_err(|e| EngineError::Autopilot {
        message: format!("failed to read config file: {e}"),
    })?;
    parse_autopilot_config(&contents)
}

/// Extract the `autopilot` section from a YAML document.
fn parse_autopilot_config(yaml: &str) -> Result<AutopilotConfig, EngineError> {
    let raw: serde_yml::Value = serde_yml::from_str(yaml).map_err(|e| EngineError::Autopilot {
        message: format!("failed to parse config YAML: {e}"),
    })?;

    let Some(section) = raw.get("autopilot") else {
        return Ok(AutopilotConfig::default());
    };
    serde_yml::from_value(section.clone()).map_err(|e| EngineError::Autopilot {
        message: format!("failed to parse autopilot config: {e}"),
    })
}
