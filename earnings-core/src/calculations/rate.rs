//! Per-second after-tax earnings rate.
//!
//! ```text
//! rate = round4(salary / (work_hours * 3600 * (1 + tax_rate)))
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use earnings_core::calculations::per_second_rate;
//!
//! // $100 over an 8 hour day in a 5% state
//! let rate = per_second_rate(dec!(100), dec!(8), dec!(0.05)).unwrap();
//!
//! assert_eq!(rate, dec!(0.0033));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round4;

pub const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Computes the rounded per-second rate.
///
/// Returns `None` when the divisor is not positive or the arithmetic
/// overflows [`Decimal`].
pub fn per_second_rate(
    salary: Decimal,
    work_hours: Decimal,
    tax_rate: Decimal,
) -> Option<Decimal> {
    let divisor = work_hours
        .checked_mul(SECONDS_PER_HOUR)?
        .checked_mul(Decimal::ONE.checked_add(tax_rate)?)?;
    if divisor <= Decimal::ZERO {
        return None;
    }
    salary.checked_div(divisor).map(round4)
}
