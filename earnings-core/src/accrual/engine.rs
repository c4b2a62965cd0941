use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::calculations::round4;
use crate::models::{AccrualSession, EarningsProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePhase {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for EnginePhase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
        })
    }
}

/// Commands issued in a phase that does not accept them.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("a session is already {0}; clear it before starting another")]
    AlreadyActive(EnginePhase),

    #[error("no running session to stop (engine is {0})")]
    NotRunning(EnginePhase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveSession {
    profile: EarningsProfile,
    session: AccrualSession,
}

/// Owns the profile and session for one start/stop cycle.
///
/// The profile's rate is fixed from `start` until `clear`; changing the
/// inputs means clearing and starting again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccrualEngine {
    active: Option<ActiveSession>,
}

impl AccrualEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> EnginePhase {
        match &self.active {
            None => EnginePhase::Idle,
            Some(active) if active.session.running => EnginePhase::Running,
            Some(_) => EnginePhase::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == EnginePhase::Running
    }

    pub fn profile(&self) -> Option<&EarningsProfile> {
        self.active.as_ref().map(|active| &active.profile)
    }

    pub fn session(&self) -> Option<&AccrualSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    /// Total earned so far; zero when idle.
    pub fn accumulated(&self) -> Decimal {
        self.session()
            .map(|session| session.accumulated)
            .unwrap_or(Decimal::ZERO)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// `Idle -> Running`. Stamps the start time and zeroes the total.
    pub fn start(
        &mut self,
        profile: EarningsProfile,
        clock: &dyn Clock,
    ) -> Result<&AccrualSession, EngineError> {
        let phase = self.phase();
        if phase != EnginePhase::Idle {
            return Err(EngineError::AlreadyActive(phase));
        }

        let session = AccrualSession::started_at(clock.now());
        info!(
            name = %profile.name,
            rate = %profile.per_second_rate,
            start = %session.start_label(),
            "accrual started"
        );
        let active = self.active.insert(ActiveSession { profile, session });
        Ok(&active.session)
    }

    /// Adds one increment while running and returns the new total.
    ///
    /// Ticks in any other phase are ignored and return `None`.
    pub fn tick(&mut self) -> Option<Decimal> {
        let active = self.active.as_mut().filter(|active| active.session.running)?;
        let session = &mut active.session;

        match session
            .accumulated
            .checked_add(active.profile.per_second_rate)
        {
            Some(sum) => session.accumulated = round4(sum),
            None => warn!(total = %session.accumulated, "accrual total saturated"),
        }
        Some(session.accumulated)
    }

    /// `Running -> Stopped`. Stamps the end time and returns the frozen total.
    pub fn stop(
        &mut self,
        clock: &dyn Clock,
    ) -> Result<Decimal, EngineError> {
        let phase = self.phase();
        let Some(active) = self.active.as_mut().filter(|active| active.session.running) else {
            return Err(EngineError::NotRunning(phase));
        };

        let session = &mut active.session;
        session.running = false;
        session.end_time = Some(clock.now());
        info!(
            total = %session.accumulated,
            end = %session.end_label(),
            "accrual stopped"
        );
        Ok(session.accumulated)
    }

    /// Any phase `-> Idle`. Discards the profile and session.
    ///
    /// Returns `false` when the engine was already idle.
    pub fn clear(&mut self) -> bool {
        let discarded = self.active.take();
        if discarded.is_some() {
            debug!("accrual cleared");
        }
        discarded.is_some()
    }
}
