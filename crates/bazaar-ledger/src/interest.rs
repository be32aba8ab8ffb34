//! Interest on the shop's debt.

use rust_decimal::Decimal;

use crate::LedgerError;

/// Interest owed for one day: `ceil(debt * rate)`.
///
/// # Errors
///
/// Returns [`LedgerError::ArithmeticOverflow`] if the product overflows.
pub fn interest_due(debt: Decimal, rate: Decimal) -> Result<Decimal, LedgerError> {
    let raw = debt
        .checked_mul(rate)
        .ok_or_else(|| LedgerError::ArithmeticOverflow {
            context: String::from("debt * interest rate"),
        })?;
    Ok(raw.ceil())
}
