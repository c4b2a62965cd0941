//! Form validation.
//!
//! Turns a [`RawFormInput`] into an [`EarningsProfile`]. Rules run in a fixed
//! order and the first failure is reported:
//!
//! 1. first name present
//! 2. salary and work hours are positive numbers
//! 3. every required field present
//! 4. state is a key of the tax table
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use earnings_core::{FormField, RawFormInput, TaxRateTable, validate};
//!
//! let table: TaxRateTable = [("Ohio", dec!(0.05))].into_iter().collect();
//! let mut form = RawFormInput::default();
//! form.set(FormField::FirstName, "ada");
//! form.set(FormField::Salary, "100");
//! form.set(FormField::WorkHours, "8");
//! form.set(FormField::State, "ohio");
//!
//! let profile = validate(&form, &table).unwrap();
//!
//! assert_eq!(profile.name, "Ada");
//! assert_eq!(profile.per_second_rate, dec!(0.0033));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::{parse_amount, per_second_rate};
use crate::models::{EarningsProfile, FormField, RawFormInput, TaxRateTable};

/// Reasons a submission is refused. None of them are fatal; the user fixes
/// the form and submits again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is blank after trimming.
    #[error("Required fields cannot be empty ({0} is blank)")]
    EmptyRequiredField(FormField),

    /// Salary or work hours is not a positive number.
    #[error("Invalid input values ({0} must be a positive number)")]
    InvalidNumericInput(FormField),

    /// The state is not a key of the tax table.
    #[error("Invalid State: '{0}' is not in the tax table")]
    UnknownState(String),
}

/// Validates `raw` against `table` and derives the per-second rate.
pub fn validate(
    raw: &RawFormInput,
    table: &TaxRateTable,
) -> Result<EarningsProfile, ValidationError> {
    let result = check(raw, table);
    match &result {
        Ok(profile) => debug!(
            name = %profile.name,
            rate = %profile.per_second_rate,
            "form accepted"
        ),
        Err(error) => warn!(%error, "form rejected"),
    }
    result
}

fn check(
    raw: &RawFormInput,
    table: &TaxRateTable,
) -> Result<EarningsProfile, ValidationError> {
    let input = raw.trimmed();

    if input.first_name.is_empty() {
        return Err(ValidationError::EmptyRequiredField(FormField::FirstName));
    }

    let salary = positive_amount(&input.salary)
        .ok_or(ValidationError::InvalidNumericInput(FormField::Salary))?;
    let work_hours = positive_amount(&input.work_hours)
        .ok_or(ValidationError::InvalidNumericInput(FormField::WorkHours))?;

    if let Some(field) = input.blank_required_fields().first() {
        return Err(ValidationError::EmptyRequiredField(*field));
    }

    let tax_rate = table
        .get(&input.state)
        .ok_or_else(|| ValidationError::UnknownState(input.state.clone()))?;

    let per_second_rate = per_second_rate(salary, work_hours, tax_rate)
        .ok_or(ValidationError::InvalidNumericInput(FormField::Salary))?;

    Ok(EarningsProfile {
        name: input.first_name,
        title: input.job_title,
        per_second_rate,
    })
}

fn positive_amount(s: &str) -> Option<Decimal> {
    parse_amount(s).filter(|value| *value > Decimal::ZERO)
}
