//! Shared type definitions for the Bazaar trading simulation.
//!
//! This crate is the single source of truth for the data that crosses
//! crate boundaries: identifiers, the catalog, the input key set, and the
//! render snapshot. Snapshot types flow to `TypeScript` via `ts-rs` for the
//! browser renderer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for customers and ledger entries
//! - [`enums`] -- Catalog items, customer kinds, keys, presentation enums
//! - [`structs`] -- Positions, haggle challenges, snapshots, day summaries

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ColorClass, CustomerKind, FlashTarget, HaggleKey, InputKey, Item, LedgerEntryKind,
    MessageTone, ParseKeyError, TradingPhase,
};
pub use ids::{CustomerId, LedgerEntryId};
pub use structs::{
    CustomerView, DayStats, DaySummary, FlashIndicator, HaggleChallenge, LedgerEntry, Position,
    ShopSnapshot, StockLevel,
};
