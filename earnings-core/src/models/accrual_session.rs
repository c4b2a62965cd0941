use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accrual::format_clock_time;

/// Running totals and timestamps for one start/stop cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualSession {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Total earned so far, rounded to four decimal places.
    pub accumulated: Decimal,
    pub running: bool,
}

impl AccrualSession {
    /// A fresh running session stamped with `start_time`.
    pub fn started_at(start_time: NaiveTime) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: None,
            accumulated: Decimal::ZERO,
            running: true,
        }
    }

    /// Start time as `h:mm AM/PM`, or an empty string.
    pub fn start_label(&self) -> String {
        self.start_time.map(format_clock_time).unwrap_or_default()
    }

    /// End time as `h:mm AM/PM`, or an empty string while running.
    pub fn end_label(&self) -> String {
        self.end_time.map(format_clock_time).unwrap_or_default()
    }
}
