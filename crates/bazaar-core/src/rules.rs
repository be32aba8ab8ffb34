//! Fixed layout and economy rules for the shop floor.
//!
//! Coordinates are character-grid units. The counter sits at the left end
//! of the counter row; customers enter from the right and queue toward it.

use bazaar_types::Position;

/// Where a customer must stand to be served.
pub const COUNTER_POSITION: Position = Position::new(36.0, 5.0);

/// Where new customers appear.
pub const SPAWN_POSITION: Position = Position::new(80.0, 5.0);

/// Column of the first slot behind the counter.
pub const QUEUE_START_X: f64 = 39.0;

/// Columns between neighbouring queue slots.
pub const QUEUE_SPACING: f64 = 2.0;

/// Most customers in the shop at once.
pub const QUEUE_CAPACITY: usize = 5;

/// Speed at which the queue slides customers along, units per second.
pub const QUEUE_MOVE_SPEED: f64 = 24.0;

/// Distance under which a waiting customer snaps onto its slot.
pub const SNAP_THRESHOLD: f64 = 0.1;

/// Distance under which a customer counts as at the counter (or at its slot).
pub const COUNTER_THRESHOLD: f64 = 0.2;

/// Column at which departing customers leave the shop.
pub const EXIT_X: f64 = 85.0;

/// Seconds before the first customer of a day appears.
pub const INITIAL_SPAWN_DELAY: f64 = 0.2;

/// Lower bound (inclusive) of the gap between spawns, in seconds.
pub const SPAWN_INTERVAL_MIN: f64 = 1.5;

/// Upper bound (exclusive) of the gap between spawns, in seconds.
pub const SPAWN_INTERVAL_MAX: f64 = 1.7;

/// Reputation change for offering the wrong item.
pub const WRONG_ITEM_REPUTATION: i64 = -2;

/// Reputation change for a completed sale.
pub const SALE_REPUTATION: i64 = 1;

/// Reputation change for a lost haggle.
pub const FAILED_HAGGLE_REPUTATION: i64 = -5;

/// Haggling is only offered while more than this fraction of patience is left.
pub const HAGGLE_PATIENCE_GATE: f64 = 0.5;

/// Seconds a flash indicator stays lit.
pub const FLASH_DURATION: f64 = 0.5;

/// Length of the trading window, in seconds.
pub const TRADING_DAY_SECS: f64 = 60.0;

/// Simulated seconds per step (30 Hz).
pub const STEP_SECS: f64 = 1.0 / 30.0;
