//! Shop money, reputation, debt, and day bookkeeping for the Bazaar simulation.
//!
//! The ledger is the only place money and reputation change. The sale path
//! talks to it through the [`Economy`] trait; the day clock calls
//! [`ShopLedger::close_day`] when the trading window ends.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`ShopLedger`] struct: balances, day stats, entry log
//! - [`economy`] -- The [`Economy`] trait used by the sale resolver
//! - [`interest`] -- Interest computation on the outstanding debt
//!
//! # Precision
//!
//! Money and debt use [`Decimal`]; interest is rounded up to the whole
//! unit. Reputation is a plain signed integer and saturates.
//!
//! # Usage
//!
//! ```
//! use bazaar_ledger::{Economy, ShopLedger};
//! use bazaar_types::Item;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = ShopLedger::new();
//! ledger.credit(Item::FakeId, 100).ok();
//! assert_eq!(ledger.money(), Decimal::from(1100));
//!
//! let summary = ledger.close_day().ok();
//! assert_eq!(summary.map(|s| s.interest_paid), Some(Decimal::from(200)));
//! ```

pub mod economy;
pub mod interest;
pub mod ledger;

// Re-export primary types at crate root.
pub use economy::Economy;
pub use interest::interest_due;
pub use ledger::{INTEREST_RATE, STARTING_DEBT, STARTING_MONEY, STARTING_REPUTATION, ShopLedger};

use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Credited amounts must be strictly positive.
    #[error("ledger amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// A balance computation overflowed.
    #[error("ledger arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Which computation overflowed.
        context: String,
    },
}
