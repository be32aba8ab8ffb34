//! The economy boundary used by the sale resolver.
//!
//! The resolver never touches balances directly; it reports what happened
//! through this trait. [`ShopLedger`](crate::ShopLedger) is the production
//! implementation.

use bazaar_types::Item;

use crate::LedgerError;

/// Economic side effects of serving customers.
pub trait Economy {
    /// Credit the proceeds of one sale.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] for a zero amount or an overflowing balance.
    fn credit(&mut self, item: Item, amount: u32) -> Result<(), LedgerError>;

    /// Shift reputation by `delta`, recording `reason`.
    fn adjust_reputation(&mut self, delta: i64, reason: &str);

    /// Count a customer that left without buying.
    fn record_failed_customer(&mut self);
}
