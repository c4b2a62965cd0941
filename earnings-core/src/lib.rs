pub mod accrual;
pub mod calculations;
pub mod models;
pub mod validation;

pub use accrual::{AccrualEngine, Clock, EngineError, EnginePhase, FixedClock, SystemClock};
pub use models::*;
pub use validation::{ValidationError, validate};
