//! Queue controller, sale resolver, day clock, and step loop for the
//! Bazaar simulation.
//!
//! This crate owns the shop floor. It drives customers from
//! `bazaar-customers` through a fixed-rate step, settles sales against the
//! `bazaar-ledger` economy, and produces the render snapshot.
//!
//! # Modules
//!
//! - [`clock`] -- Trading-day clock (phases, 60-second window, day counter)
//! - [`config`] -- Configuration loading from `bazaar-config.yaml`
//! - [`effects`] -- Short-lived flash indicators
//! - [`input`] -- The [`InputSource`] trait and scripted input
//! - [`queue`] -- The [`CustomerQueue`] controller (spawning, slots, movement)
//! - [`rules`] -- Fixed layout, timing, and reputation constants
//! - [`runner`] -- Async run loop with bounds and pacing
//! - [`sale`] -- The [`SaleDesk`] resolver (sale legality and haggle results)
//! - [`snapshot`] -- Render snapshot assembly
//! - [`tick`] -- The single-step cycle ([`run_step`]) and [`ShopState`]

pub mod clock;
pub mod config;
pub mod effects;
pub mod input;
pub mod queue;
pub mod rules;
pub mod runner;
pub mod sale;
pub mod snapshot;
pub mod tick;

// Re-export primary types at crate root for convenience.
pub use clock::{ClockAdvance, ClockError, TradingDay};
pub use config::{ConfigError, ShopConfig, StockPolicy};
pub use effects::FlashBoard;
pub use input::{InputSource, NoInput, ScriptedInput};
pub use queue::{CustomerQueue, QueueTickReport};
pub use runner::{
    EndReason, NoOpCallback, RunBounds, RunResult, RunnerError, StepCallback, log_run_end,
    run_shop,
};
pub use sale::{HaggleResolution, SaleDesk, SaleOutcome};
pub use tick::{ShopState, StepSummary, TickError, run_step};
