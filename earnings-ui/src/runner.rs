//! Drives an [`AccrualEngine`](earnings_core::AccrualEngine) with a 1 Hz timer.
//!
//! The runner owns the [`AppState`] and the only timer. Commands and ticks are
//! handled one at a time on a single task, so a tick never lands halfway
//! through a stop or clear.
//!
//! The timer exists only while the engine is running:
//!
//! | transition          | timer             |
//! |---------------------|-------------------|
//! | `Idle -> Running`   | armed             |
//! | `Running -> Stopped`| dropped           |
//! | any `-> Idle`       | dropped           |
//! | runner dropped      | dropped with it   |

use std::time::Duration;

use earnings_core::{
    Clock, EngineError, EnginePhase, FormField, RawFormInput, TaxRateTable, ValidationError,
    validate,
};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// User input, one per console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace a form field; the value is normalized on the way in.
    Edit(FormField, String),
    /// Validate the form and start a session.
    Submit,
    Stop,
    Clear,
    /// Dismiss the current notice without submitting.
    Cancel,
    Show,
    Help,
    Quit,
}

/// Point-in-time view of the runner for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: EnginePhase,
    pub form: RawFormInput,
    pub heading: Option<String>,
    pub per_second_rate: Option<Decimal>,
    pub accumulated: Decimal,
    pub start_time: String,
    pub end_time: String,
    pub timer_armed: bool,
}

/// Everything the display needs to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    FormChanged {
        field: FormField,
        value: String,
    },
    Started {
        heading: String,
        per_second_rate: Decimal,
        start_time: String,
    },
    Tick {
        accumulated: Decimal,
    },
    Stopped {
        accumulated: Decimal,
        start_time: String,
        end_time: String,
    },
    Cleared,
    Rejected(ValidationError),
    Refused(EngineError),
    /// A console line that is not a command.
    Unrecognized(String),
    Dismissed,
    Snapshot(Snapshot),
    Help,
    Closed,
}

pub struct AccrualRunner<C> {
    state: AppState,
    clock: C,
    table: TaxRateTable,
    ticker: Option<Interval>,
}

impl<C: Clock> AccrualRunner<C> {
    pub fn new(
        table: TaxRateTable,
        clock: C,
    ) -> Self {
        Self {
            state: AppState::new(),
            clock,
            table,
            ticker: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn timer_armed(&self) -> bool {
        self.ticker.is_some()
    }

    /// Applies one command. Must be called inside a tokio runtime because a
    /// successful submit arms the timer.
    pub fn handle(
        &mut self,
        command: Command,
    ) -> Update {
        let update = match command {
            Command::Edit(field, value) => {
                self.state.form.set(field, &value);
                Update::FormChanged {
                    field,
                    value: self.state.form.get(field).to_string(),
                }
            }
            Command::Submit => self.submit(),
            Command::Stop => self.stop(),
            Command::Clear => {
                self.disarm();
                self.state.clear();
                Update::Cleared
            }
            Command::Cancel => Update::Dismissed,
            Command::Show => Update::Snapshot(self.snapshot()),
            Command::Help => Update::Help,
            Command::Quit => {
                self.disarm();
                Update::Closed
            }
        };
        debug_assert!(
            update == Update::Closed || self.timer_armed() == self.state.engine.is_running()
        );
        update
    }

    /// One timer expiry: adds a single increment.
    pub fn tick(&mut self) -> Option<Update> {
        match self.state.engine.tick() {
            Some(accumulated) => Some(Update::Tick { accumulated }),
            None => {
                // Engine left Running without the timer being dropped.
                self.disarm();
                None
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let engine = &self.state.engine;
        let session = engine.session();
        Snapshot {
            phase: engine.phase(),
            form: self.state.form.clone(),
            heading: engine.profile().map(|profile| profile.heading()),
            per_second_rate: engine.profile().map(|profile| profile.per_second_rate),
            accumulated: engine.accumulated(),
            start_time: session.map(|s| s.start_label()).unwrap_or_default(),
            end_time: session.map(|s| s.end_label()).unwrap_or_default(),
            timer_armed: self.timer_armed(),
        }
    }

    /// Handles commands and ticks until `Quit` arrives or either channel
    /// closes, then returns the final state. The timer is released on every
    /// exit path.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        updates: mpsc::Sender<Update>,
    ) -> AppState {
        enum Event {
            Tick,
            Command(Option<Command>),
        }

        loop {
            let event = tokio::select! {
                _ = next_tick(&mut self.ticker) => Event::Tick,
                command = commands.recv() => Event::Command(command),
            };

            let (update, closing) = match event {
                Event::Tick => match self.tick() {
                    Some(update) => (update, false),
                    None => continue,
                },
                Event::Command(Some(command)) => {
                    let update = self.handle(command);
                    let closing = update == Update::Closed;
                    (update, closing)
                }
                Event::Command(None) => (self.handle(Command::Quit), true),
            };

            if updates.send(update).await.is_err() {
                debug!("display closed; stopping runner");
                break;
            }
            if closing {
                break;
            }
        }

        self.disarm();
        self.state
    }

    fn submit(&mut self) -> Update {
        let phase = self.state.phase();
        if phase != EnginePhase::Idle {
            return Update::Refused(EngineError::AlreadyActive(phase));
        }

        let profile = match validate(&self.state.form, &self.table) {
            Ok(profile) => profile,
            Err(error) => return Update::Rejected(error),
        };
        let heading = profile.heading();
        let per_second_rate = profile.per_second_rate;

        match self.state.engine.start(profile, &self.clock) {
            Ok(session) => {
                let start_time = session.start_label();
                self.arm();
                Update::Started {
                    heading,
                    per_second_rate,
                    start_time,
                }
            }
            Err(error) => Update::Refused(error),
        }
    }

    fn stop(&mut self) -> Update {
        match self.state.engine.stop(&self.clock) {
            Ok(accumulated) => {
                self.disarm();
                let session = self.state.engine.session();
                Update::Stopped {
                    accumulated,
                    start_time: session.map(|s| s.start_label()).unwrap_or_default(),
                    end_time: session.map(|s| s.end_label()).unwrap_or_default(),
                }
            }
            Err(error) => Update::Refused(error),
        }
    }

    fn arm(&mut self) {
        debug_assert!(self.ticker.is_none(), "timer already armed");
        let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        // A late tick is delivered once; missed periods are not replayed.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(interval);
        info!("accrual timer armed");
    }

    fn disarm(&mut self) {
        if self.ticker.take().is_some() {
            info!("accrual timer released");
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
