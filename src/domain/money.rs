//! Monetary amounts as stored in `NUMERIC(12, 2)` columns.

use rust_decimal::Decimal;

use crate::errors::{AppError, AppResult};

/// Digits allowed before the decimal point.
pub const MONEY_INTEGER_DIGITS: u32 = 10;

/// Digits allowed after the decimal point.
pub const MONEY_SCALE: u32 = 2;

/// Check that `amount` is non-negative and fits the money columns.
///
/// Trailing zeros are ignored, so `"50.000"` is accepted as `50`.
pub fn validate_money(field: &str, amount: Decimal) -> AppResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::validation(format!("{} cannot be negative", field)));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::validation(format!(
            "{} must have at most {} decimal places",
            field, MONEY_SCALE
        )));
    }
    if amount.trunc() >= Decimal::from(10_i64.pow(MONEY_INTEGER_DIGITS)) {
        return Err(AppError::validation(format!(
            "{} must be less than 10^{}",
            field, MONEY_INTEGER_DIGITS
        )));
    }
    Ok(())
}

/// Sum two amounts, failing instead of overflowing.
pub fn checked_sum(field: &str, a: Decimal, b: Decimal) -> AppResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| AppError::validation(format!("{} is out of range", field)))
}
