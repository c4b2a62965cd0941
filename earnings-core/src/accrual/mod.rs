//! Earnings accrual state machine.
//!
//! ```text
//! Idle --start--> Running --stop--> Stopped
//!   ^                |                 |
//!   +-----clear------+------clear------+
//! ```
//!
//! The engine has no timer of its own. Whoever drives it calls
//! [`AccrualEngine::tick`] once per second while it is running.

mod clock;
mod engine;

pub use clock::{Clock, FixedClock, SystemClock, format_clock_time};
pub use engine::{AccrualEngine, EngineError, EnginePhase};
