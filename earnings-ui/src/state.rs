//! Application state for the live earnings front end.
//!
//! One explicit object holds the form and the accrual engine; the runner
//! owns it and nothing else mutates it.

use earnings_core::{AccrualEngine, EnginePhase, RawFormInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Form contents as typed (normalized on every edit).
    pub form: RawFormInput,
    /// Profile, session and running total.
    pub engine: AccrualEngine,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EnginePhase {
        self.engine.phase()
    }

    /// Reset the form and discard any session, returning to idle.
    pub fn clear(&mut self) {
        self.form.clear();
        self.engine.clear();
    }
}
