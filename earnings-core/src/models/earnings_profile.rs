use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A validated form submission, ready to drive an accrual session.
///
/// Only [`crate::validate`] builds these; the engine trusts them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsProfile {
    pub name: String,
    /// Job title, may be empty.
    pub title: String,
    /// After-tax earnings per second, rounded to four decimal places.
    pub per_second_rate: Decimal,
}

impl EarningsProfile {
    /// Display heading such as `"Engineer Ada's Income"`.
    pub fn heading(&self) -> String {
        if self.title.is_empty() {
            format!("{}'s Income", self.name)
        } else {
            format!("{} {}'s Income", self.title, self.name)
        }
    }
}
