//! Fixed rule constants for customer behaviour.
//!
//! These values are the game's rules, not tunables: they are deliberately
//! not loaded from configuration. The queue layout constants live with the
//! queue controller in `bazaar-core`.

use bazaar_types::Position;

/// Lower bound (inclusive) of a customer's patience, in seconds.
pub const PATIENCE_MIN_SECS: f64 = 9.0;

/// Upper bound (exclusive) of a customer's patience, in seconds.
pub const PATIENCE_MAX_SECS: f64 = 15.0;

/// Probability that a customer is an undercover agent.
pub const COVERT_CHANCE: f64 = 0.15;

/// Fewest haggle rounds a customer will demand.
pub const MIN_HAGGLE_ROUNDS: u32 = 1;

/// Most haggle rounds a customer will demand.
pub const MAX_HAGGLE_ROUNDS: u32 = 3;

/// Seconds allowed to answer one haggle round.
pub const HAGGLE_TIME_LIMIT_SECS: f64 = 2.0;

/// Fraction knocked off the price when a haggle round is lost.
pub const HAGGLE_PRICE_CUT: f64 = 0.2;

/// Reference price every negotiation starts from.
pub const BASE_PRICE: u32 = 100;

/// Speed at which a customer walks toward its target, units per second.
pub const WALK_SPEED: f64 = 20.0;

/// Off-stage coordinate departing customers walk to.
pub const EXIT_POSITION: Position = Position::new(85.0, 4.0);

/// Factor applied to the patience limit when offered the wrong item.
pub const WRONG_ITEM_PATIENCE_FACTOR: f64 = 0.5;

/// Seconds a covert customer glows red after being offered the wrong item.
pub const WARNING_FLASH_SECS: f64 = 0.5;
