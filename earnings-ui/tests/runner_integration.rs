//! Drives the runner's event loop on virtual time.

use std::time::Duration;

use earnings_core::{EnginePhase, FixedClock, FormField, TaxRateTable, ValidationError};
use earnings_ui::{AccrualRunner, AppState, Command, Update};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

struct Harness {
    commands: mpsc::Sender<Command>,
    updates: mpsc::Receiver<Update>,
    task: JoinHandle<AppState>,
}

impl Harness {
    fn start() -> Self {
        let table: TaxRateTable = [("Ohio", dec!(0.05))].into_iter().collect();
        let runner = AccrualRunner::new(table, FixedClock::at(14, 45).expect("valid time"));
        let (command_tx, command_rx) = mpsc::channel(16);
        let (update_tx, update_rx) = mpsc::channel(64);
        let task = tokio::spawn(runner.run(command_rx, update_tx));
        Self {
            commands: command_tx,
            updates: update_rx,
            task,
        }
    }

    async fn send(
        &self,
        command: Command,
    ) {
        self.commands.send(command).await.expect("runner is alive");
    }

    async fn next(&mut self) -> Update {
        self.updates.recv().await.expect("runner is alive")
    }

    /// Everything the runner has emitted so far.
    fn drain(&mut self) -> Vec<Update> {
        let mut drained = Vec::new();
        while let Ok(update) = self.updates.try_recv() {
            drained.push(update);
        }
        drained
    }

    async fn fill_reference_form(&mut self) {
        for (field, value) in [
            (FormField::FirstName, "ada"),
            (FormField::JobTitle, "engineer"),
            (FormField::Salary, "100"),
            (FormField::WorkHours, "8"),
            (FormField::State, "ohio"),
        ] {
            self.send(Command::Edit(field, value.to_string())).await;
            assert!(matches!(self.next().await, Update::FormChanged { .. }));
        }
    }
}

fn ticks(updates: &[Update]) -> Vec<Decimal> {
    updates
        .iter()
        .filter_map(|update| match update {
            Update::Tick { accumulated } => Some(*accumulated),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_three_seconds_accrue_reference_amount() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;

    harness.send(Command::Submit).await;
    assert!(matches!(harness.next().await, Update::Started { .. }));
    sleep(Duration::from_millis(3500)).await;

    assert_eq!(
        ticks(&harness.drain()),
        vec![dec!(0.0033), dec!(0.0066), dec!(0.0099)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_freezes_total_and_silences_timer() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;
    harness.send(Command::Submit).await;
    harness.next().await;
    sleep(Duration::from_millis(3500)).await;
    harness.drain();

    harness.send(Command::Stop).await;
    let stopped = harness.next().await;
    sleep(Duration::from_secs(10)).await;

    assert_eq!(
        stopped,
        Update::Stopped {
            accumulated: dec!(0.0099),
            start_time: "2:45 PM".to_string(),
            end_time: "2:45 PM".to_string(),
        }
    );
    assert_eq!(harness.drain(), Vec::<Update>::new());
}

#[tokio::test(start_paused = true)]
async fn test_start_stop_clear_returns_to_idle() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;
    harness.send(Command::Submit).await;
    harness.next().await;
    sleep(Duration::from_millis(1500)).await;
    harness.send(Command::Stop).await;
    sleep(Duration::from_millis(100)).await;
    harness.drain();

    harness.send(Command::Clear).await;
    assert_eq!(harness.next().await, Update::Cleared);
    sleep(Duration::from_secs(5)).await;
    harness.send(Command::Show).await;

    let Update::Snapshot(snapshot) = harness.next().await else {
        panic!("expected a snapshot");
    };
    assert_eq!(snapshot.phase, EnginePhase::Idle);
    assert_eq!(snapshot.accumulated, Decimal::ZERO);
    assert_eq!(snapshot.start_time, "");
    assert_eq!(snapshot.end_time, "");
    assert_eq!(snapshot.heading, None);
    assert!(!snapshot.timer_armed);
    assert_eq!(snapshot.form.first_name, "");
}

#[tokio::test(start_paused = true)]
async fn test_clear_while_running_stops_increments() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;
    harness.send(Command::Submit).await;
    harness.next().await;
    sleep(Duration::from_millis(2500)).await;

    harness.send(Command::Clear).await;
    sleep(Duration::from_secs(5)).await;

    let after = harness.drain();
    assert_eq!(ticks(&after), vec![dec!(0.0033), dec!(0.0066)]);
    assert_eq!(after.last(), Some(&Update::Cleared));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_form_never_ticks() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;
    harness
        .send(Command::Edit(FormField::State, "Nowhereland".to_string()))
        .await;
    harness.next().await;

    harness.send(Command::Submit).await;
    let rejected = harness.next().await;
    sleep(Duration::from_secs(3)).await;

    assert_eq!(
        rejected,
        Update::Rejected(ValidationError::UnknownState("Nowhereland".to_string()))
    );
    assert_eq!(harness.drain(), Vec::<Update>::new());
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_clear_uses_new_rate() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;
    harness.send(Command::Submit).await;
    harness.next().await;
    sleep(Duration::from_millis(1500)).await;
    harness.send(Command::Clear).await;
    sleep(Duration::from_millis(100)).await;
    harness.drain();

    harness.fill_reference_form().await;
    harness
        .send(Command::Edit(FormField::Salary, "36".to_string()))
        .await;
    harness.send(Command::Edit(FormField::WorkHours, "1".to_string())).await;
    harness.send(Command::Edit(FormField::State, "ohio".to_string())).await;
    harness.send(Command::Submit).await;
    sleep(Duration::from_millis(2500)).await;

    // 36 / (1 * 3600 * 1.05) = 0.009523... -> 0.0095
    assert_eq!(ticks(&harness.drain()), vec![dec!(0.0095), dec!(0.019)]);
}

#[tokio::test(start_paused = true)]
async fn test_quit_returns_final_state() {
    let mut harness = Harness::start();
    harness.fill_reference_form().await;
    harness.send(Command::Submit).await;
    harness.next().await;
    sleep(Duration::from_millis(1500)).await;

    harness.send(Command::Quit).await;
    let state = harness.task.await.expect("runner task completes");

    assert_eq!(state.engine.accumulated(), dec!(0.0033));
    assert_eq!(state.phase(), EnginePhase::Running);
}

#[tokio::test(start_paused = true)]
async fn test_closed_command_channel_ends_runner() {
    let Harness {
        commands,
        mut updates,
        task,
    } = Harness::start();

    drop(commands);

    assert_eq!(updates.recv().await, Some(Update::Closed));
    let state = task.await.expect("runner task completes");
    assert_eq!(state, AppState::new());
}
