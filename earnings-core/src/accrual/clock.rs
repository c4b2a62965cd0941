//! Wall-clock port used to stamp session start and end times.

use std::sync::Mutex;

use chrono::{Local, NaiveTime};

/// Source of the current local wall-clock time.
///
/// Only used for display timestamps, never for tick cadence.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock that reports whatever time it was last set to.
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<NaiveTime>,
}

impl FixedClock {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Clock fixed at `hour:minute`, or `None` for an out-of-range time.
    pub fn at(
        hour: u32,
        minute: u32,
    ) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self::new)
    }

    pub fn set(
        &self,
        time: NaiveTime,
    ) {
        *self.time.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Formats a time as `h:mm AM/PM`, e.g. `2:45 PM`.
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_clock_time_uses_twelve_hour_clock() {
        let time = NaiveTime::from_hms_opt(14, 45, 30).unwrap();

        assert_eq!(format_clock_time(time), "2:45 PM");
    }

    #[test]
    fn format_clock_time_handles_midnight_and_morning() {
        assert_eq!(format_clock_time(NaiveTime::from_hms_opt(0, 5, 0).unwrap()), "12:05 AM");
        assert_eq!(format_clock_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()), "9:00 AM");
    }

    #[test]
    fn fixed_clock_reports_last_set_time() {
        let clock = FixedClock::at(9, 0).unwrap();
        assert_eq!(clock.now(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());

        clock.set(NaiveTime::from_hms_opt(17, 30, 0).unwrap());

        assert_eq!(clock.now(), NaiveTime::from_hms_opt(17, 30, 0).unwrap());
    }

    #[test]
    fn fixed_clock_rejects_invalid_time() {
        assert!(FixedClock::at(25, 0).is_none());
    }
}
