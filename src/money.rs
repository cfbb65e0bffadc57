//! Conversions between the fixed-point decimal amounts used in the API and
//! the integer cents stored in the database.
//!
//! Storing cents keeps balance arithmetic exact and lets SQL compare and
//! mutate balances in a single statement.

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Error;

/// Convert a count of cents from the database into a decimal with two
/// fractional digits, e.g. `10000` becomes `100.00`.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert a decimal amount into whole cents for storage.
///
/// # Errors
/// Returns [Error::AmountPrecision] if `amount` has more than two decimal
/// places or does not fit in an `i64` count of cents.
pub fn decimal_to_cents(amount: Decimal) -> Result<i64, Error> {
    let cents = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(Error::AmountPrecision)?;

    if cents.fract() != Decimal::ZERO {
        return Err(Error::AmountPrecision);
    }

    cents.to_i64().ok_or(Error::AmountPrecision)
}
