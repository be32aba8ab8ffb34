//! Error types for the bazaar-customers crate.
//!
//! These are contract violations (calling a haggle operation in the wrong
//! state, consuming stock that is not there). Game-semantic outcomes such
//! as a lost haggle or an abandoned queue are ordinary return values, never
//! errors.

use bazaar_types::{CustomerId, Item};

/// Errors raised by customer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerError {
    /// A haggle round was requested but the customer has none left.
    #[error("customer {customer} has no haggle rounds left")]
    NoHaggleRoundsLeft {
        /// The customer that refused to haggle.
        customer: CustomerId,
    },

    /// Haggle input was delivered while no round was running.
    #[error("customer {customer} has no active haggle challenge")]
    NoActiveChallenge {
        /// The customer the input was addressed to.
        customer: CustomerId,
    },

    /// The customer is already on the way out.
    #[error("customer {customer} is departing")]
    Departing {
        /// The departing customer.
        customer: CustomerId,
    },
}

/// Errors raised by stock keepers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StockError {
    /// Tried to consume an item with no units on hand.
    #[error("out of stock: {item}")]
    OutOfStock {
        /// The depleted item.
        item: Item,
    },

    /// Adding a new item line would exceed the number of distinct lines.
    #[error("inventory full: cannot add {item} (capacity {capacity} item lines)")]
    CapacityExceeded {
        /// The item that did not fit.
        item: Item,
        /// Maximum number of distinct item lines.
        capacity: usize,
    },

    /// A quantity update overflowed.
    #[error("stock quantity overflow for {item}")]
    QuantityOverflow {
        /// The item whose count overflowed.
        item: Item,
    },
}
