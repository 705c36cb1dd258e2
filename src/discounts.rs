//! Discounts
//!
//! Exact decimal arithmetic shared by every payment option. All amounts are
//! rounded to two decimal places, half-up, at the point they are produced so
//! that rounding never drifts across a long batch.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every monetary amount is rounded to.
pub const AMOUNT_SCALE: u32 = 2;

/// Rate applied to an order when loyalty points are combined with a card.
///
/// Independent of the loyalty method's own configured discount.
pub const COMBINATION_DISCOUNT_PERCENT: u8 = 10;

/// Share of the raw order value the loyalty balance must cover before the
/// combination rule applies.
pub const COMBINATION_MINIMUM_PERCENT: u8 = 10;

/// Round an amount to [`AMOUNT_SCALE`] places, half-up.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole-number percentage as a [`Percentage`].
pub fn percentage(percent: u8) -> Percentage {
    Percentage::from(Decimal::new(i64::from(percent), 2))
}

/// `percent`% of `value`, rounded.
pub fn percent_of(value: Decimal, percent: u8) -> Decimal {
    round_amount(percentage(percent) * value)
}

/// Price of `value` after taking `percent`% off, rounded.
///
/// Computed as `value * (100 - percent) / 100`. Percentages above 100 are
/// treated as 100.
pub fn apply_discount(value: Decimal, percent: u8) -> Decimal {
    percent_of(value, 100 - percent.min(100))
}
