//! Wiring between the console, the runner and the display.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use earnings_core::{Clock, TaxRateTable};
use earnings_data::{TaxRateLoader, default_table};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::console::{ParseCommandError, parse_command};
use crate::logging::log_task_error;
use crate::runner::{AccrualRunner, Command, Update};
use crate::views::Renderer;

/// Loads the configured tax table, or the bundled one.
pub fn load_tax_table(config: &AppConfig) -> Result<TaxRateTable> {
    let table = match &config.rates_file {
        Some(path) => TaxRateLoader::from_path(path)
            .with_context(|| format!("Failed to load tax table: {}", path.display()))?,
        None => default_table().context("Failed to parse bundled tax table")?,
    };
    if table.is_empty() {
        warn!("tax table is empty; every state will be rejected");
    }
    info!(states = table.len(), "tax table ready");
    Ok(table)
}

/// Runs the interactive session until the user quits or stdin closes.
///
/// `initial` commands (e.g. from command-line flags) are applied before any
/// console input. Stdin is read on its own thread so a pending read never
/// holds up shutdown.
pub async fn run<C: Clock + 'static>(
    runner: AccrualRunner<C>,
    initial: Vec<Command>,
    notice_ttl: Duration,
) -> Result<()> {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (update_tx, update_rx) = mpsc::channel(64);

    for command in initial {
        command_tx
            .send(command)
            .await
            .context("runner stopped before start-up commands were applied")?;
    }

    let runner_task = tokio::spawn(runner.run(command_rx, update_tx.clone()));

    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            let stdin = io::stdin().lock();
            log_task_error("console input", read_commands(stdin, command_tx, update_tx));
        })
        .context("failed to start console input thread")?;

    let mut renderer = Renderer::new(io::stdout(), notice_ttl);
    let rendered = render_updates(&mut renderer, update_rx).await;

    let final_state = runner_task.await.context("runner task failed")?;
    debug!(phase = %final_state.phase(), "session closed");
    rendered
}

/// Forwards parsed console lines to the runner. Parse errors go straight to
/// the display. End of input quits.
///
/// Blocking; run it on a plain thread, not inside the runtime.
pub fn read_commands<R: BufRead>(
    input: R,
    commands: mpsc::Sender<Command>,
    notices: mpsc::Sender<Update>,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read console input")?;
        match parse_command(&line) {
            Ok(command) => {
                let quitting = command == Command::Quit;
                if commands.blocking_send(command).is_err() || quitting {
                    return Ok(());
                }
            }
            Err(ParseCommandError::Empty) => {}
            Err(error) => {
                debug!(%error, "ignored console line");
                if notices
                    .blocking_send(Update::Unrecognized(error.to_string()))
                    .is_err()
                {
                    return Ok(());
                }
            }
        }
    }

    let _ = commands.blocking_send(Command::Quit);
    Ok(())
}

/// Renders updates until the runner closes, expiring notices on time.
pub async fn render_updates<W: Write>(
    renderer: &mut Renderer<W>,
    mut updates: mpsc::Receiver<Update>,
) -> Result<()> {
    loop {
        let expiry = renderer.status().expires_at();
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                renderer
                    .render(&update, Instant::now())
                    .context("failed to write to the display")?;
                if update == Update::Closed {
                    break;
                }
            }
            _ = sleep_until_some(expiry) => renderer.expire(Instant::now()),
        }
    }
    Ok(())
}

async fn sleep_until_some(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
