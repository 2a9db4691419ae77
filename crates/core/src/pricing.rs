//! Price and discount arithmetic.
//!
//! The purchase amount is fixed at checkout-initiation time and never
//! recomputed, so the same rounding must be applied everywhere a displayed
//! price is derived.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Discount percentages are whole numbers in `0..=100`.
pub const MAX_DISCOUNT_PERCENT: i32 = 100;

/// Validate that a discount percentage is within `0..=100`.
pub fn validate_discount(discount: i32) -> Result<(), CoreError> {
    if !(0..=MAX_DISCOUNT_PERCENT).contains(&discount) {
        return Err(CoreError::Validation(format!(
            "Discount must be between 0 and {MAX_DISCOUNT_PERCENT}, got {discount}"
        )));
    }
    Ok(())
}

/// Compute `price - price * discount / 100`, rounded to 2 decimal places.
///
/// This is both the displayed price and the amount a purchase is created
/// with. Rejects negative prices and out-of-range discounts.
pub fn discounted_amount(price: Decimal, discount: i32) -> Result<Decimal, CoreError> {
    validate_discount(discount)?;
    if price.is_sign_negative() {
        return Err(CoreError::Validation(format!(
            "Price must not be negative, got {price}"
        )));
    }

    let amount = price - price * Decimal::from(discount) / Decimal::from(100);
    Ok(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
