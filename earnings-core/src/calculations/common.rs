//! Common utility functions for earnings calculations.
//!
//! Rounding and number parsing shared by the validator and the accrual
//! engine.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly four decimal places using half-up rounding.
///
/// Values at exactly the midpoint round away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use earnings_core::calculations::common::round4;
///
/// assert_eq!(round4(dec!(0.00330687)), dec!(0.0033));
/// assert_eq!(round4(dec!(0.00335)), dec!(0.0034));
/// assert_eq!(round4(dec!(-0.00335)), dec!(-0.0034)); // Away from zero
/// ```
pub fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Comma thousands separators, e.g. `1,250` or `-12,000,000.50`.
static GROUPED_DIGITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("grouped-digits pattern is valid")
});

/// Parses user-entered numeric text.
///
/// Surrounding whitespace is ignored. Commas are accepted only as thousands
/// separators, so `"1,5"` is rejected rather than read as 15. Scientific
/// notation (`"1e3"`) is accepted; exponents beyond [`Decimal`]'s 28-digit
/// scale are rounded, so values below `1e-28` parse as zero. Returns `None`
/// for empty or unparseable input.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains(',') {
        if !GROUPED_DIGITS.is_match(trimmed) {
            return None;
        }
        return trimmed.replace(',', "").parse::<Decimal>().ok();
    }
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| parse_scaled(trimmed))
}

/// Applies a decimal exponent one power of ten at a time, letting division
/// round once the scale is exhausted.
fn parse_scaled(s: &str) -> Option<Decimal> {
    let (mantissa, exponent) = s.split_once(['e', 'E'])?;
    let mut value = mantissa.parse::<Decimal>().ok()?;
    let exponent = exponent.parse::<i32>().ok()?;

    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value = if exponent < 0 {
            value.checked_div(Decimal::TEN)?
        } else {
            value.checked_mul(Decimal::TEN)?
        };
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round4 tests
    // =========================================================================

    #[test]
    fn round4_rounds_down_below_midpoint() {
        let result = round4(dec!(0.00334));

        assert_eq!(result, dec!(0.0033));
    }

    #[test]
    fn round4_rounds_up_at_midpoint() {
        let result = round4(dec!(0.00335));

        assert_eq!(result, dec!(0.0034));
    }

    #[test]
    fn round4_preserves_already_rounded_values() {
        let result = round4(dec!(12.3456));

        assert_eq!(result, dec!(12.3456));
    }

    #[test]
    fn round4_handles_zero() {
        let result = round4(dec!(0));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn round4_drops_values_below_precision() {
        let result = round4(dec!(0.00004));

        assert_eq!(result, dec!(0.0000));
    }

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  42.5 "), Some(dec!(42.5)));
    }

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("1,250.75"), Some(dec!(1250.75)));
    }

    #[test]
    fn parse_amount_accepts_multiple_separator_groups() {
        assert_eq!(parse_amount("-12,000,000.50"), Some(dec!(-12000000.50)));
    }

    #[test]
    fn parse_amount_rejects_comma_as_decimal_mark() {
        assert_eq!(parse_amount("1,5"), None);
        assert_eq!(parse_amount("1,0"), None);
    }

    #[test]
    fn parse_amount_rejects_misplaced_separators() {
        assert_eq!(parse_amount("12,34"), None);
        assert_eq!(parse_amount("1234,567"), None);
        assert_eq!(parse_amount(",100"), None);
        assert_eq!(parse_amount("1,000,00"), None);
    }

    #[test]
    fn parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount("1e3"), Some(dec!(1000)));
    }

    #[test]
    fn parse_amount_rounds_exponents_beyond_decimal_scale() {
        let tiny = parse_amount("1e-30").unwrap();

        assert!(tiny >= Decimal::ZERO);
        assert!(tiny < dec!(0.0000000000000000000000000001));
        assert_eq!(parse_amount("2.5E-29").map(round4), Some(dec!(0)));
    }

    #[test]
    fn parse_amount_rejects_exponent_overflow() {
        assert_eq!(parse_amount("1e40"), None);
    }

    #[test]
    fn parse_amount_rejects_empty_input() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
    }

    #[test]
    fn parse_amount_rejects_text() {
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn parse_amount_keeps_sign() {
        assert_eq!(parse_amount("-8"), Some(dec!(-8)));
    }
}
