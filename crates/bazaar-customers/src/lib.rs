//! Customer entity, patience, and haggle mechanics for the Bazaar simulation.
//!
//! This crate holds the per-customer state machine and the shelf boundary
//! the sale path consults. It performs no I/O and owns no clock: callers
//! feed it elapsed time and an injected random number generator, which
//! keeps every operation deterministic under a seeded RNG.
//!
//! # Modules
//!
//! - [`customer`] -- The [`Customer`] entity and its creation profile
//! - [`error`] -- Contract-violation errors ([`CustomerError`], [`StockError`])
//! - [`haggle`] -- Haggle round construction and results ([`HaggleResult`])
//! - [`rules`] -- Fixed rule constants (patience range, haggle timing, prices)
//! - [`stock`] -- The [`StockKeeper`] boundary and its two policies

pub mod customer;
pub mod error;
pub mod haggle;
pub mod rules;
pub mod stock;

// Re-export primary types at crate root for convenience.
pub use customer::{ABANDON_MESSAGE, Customer, CustomerProfile, SOLD_MESSAGE, StepOutcome};
pub use error::{CustomerError, StockError};
pub use haggle::{HaggleResult, LOST_MESSAGE, RoundPosition, WON_MESSAGE};
pub use stock::{ShopInventory, StockKeeper, UnlimitedStock};
