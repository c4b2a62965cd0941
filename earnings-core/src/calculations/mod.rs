//! Earnings rate arithmetic.
//!
//! All money values are [`rust_decimal::Decimal`] so that the four-decimal
//! rounding applied on every tick is exact.

pub mod common;
pub mod rate;

pub use common::{parse_amount, round4};
pub use rate::{SECONDS_PER_HOUR, per_second_rate};
