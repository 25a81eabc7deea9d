//! Common utility functions for tax calculations.
//!
//! Every calculator rounds to whole dollars at the points the forms do, so
//! the rounding rule lives here in one place.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to whole dollars using half-up rounding.
///
/// Values at exactly 50 cents round away from zero, matching the IRS
/// whole-dollar rounding convention.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_dollars;
///
/// assert_eq!(round_dollars(dec!(123.49)), dec!(123));
/// assert_eq!(round_dollars(dec!(123.50)), dec!(124));
/// assert_eq!(round_dollars(dec!(-123.50)), dec!(-124)); // Away from zero
/// ```
pub fn round_dollars(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a value at zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
