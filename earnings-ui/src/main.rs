use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use earnings_core::{FormField, SystemClock};
use tracing::debug;

use earnings_ui::{AccrualRunner, AppConfig, Command, app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Live after-tax earnings counter.
///
/// Fill in the form with flags or console commands, then `start` to watch
/// your earnings tick up once per second. Type `help` for commands.
#[derive(Debug, Parser)]
#[command(name = "live-earnings", version, about)]
struct Cli {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tax-rate table (`.csv` or `.json`); overrides the config file.
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Log filter directive (e.g. `info`, `earnings_core=debug`).
    #[arg(long)]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide log output on stderr.
    #[arg(long)]
    quiet: bool,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    job_title: Option<String>,

    /// Pay for one work day.
    #[arg(long)]
    salary: Option<String>,

    /// Hours in one work day.
    #[arg(long)]
    work_hours: Option<String>,

    #[arg(long)]
    state: Option<String>,

    /// Submit the form immediately.
    #[arg(long)]
    start: bool,
}

impl Cli {
    /// Command-line values take precedence over the config file.
    fn apply_to(
        &self,
        config: &mut AppConfig,
    ) {
        if let Some(rates) = &self.rates {
            config.rates_file = Some(rates.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
        if let Some(file) = &self.log_file {
            config.log_file = Some(file.clone());
        }
    }

    /// Form edits from flags, followed by a submit when `--start` is set.
    fn initial_commands(&self) -> Vec<Command> {
        let fields = [
            (FormField::FirstName, &self.first_name),
            (FormField::JobTitle, &self.job_title),
            (FormField::Salary, &self.salary),
            (FormField::WorkHours, &self.work_hours),
            (FormField::State, &self.state),
        ];
        let mut commands: Vec<Command> = fields
            .into_iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| Command::Edit(field, v.clone())))
            .collect();
        if self.start {
            commands.push(Command::Submit);
        }
        commands
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

// One thread: the tick and the console commands never run concurrently.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    cli.apply_to(&mut config);

    if let Some(level) = &config.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    if cli.quiet {
        logging::set_stderr_enabled(false)?;
    }
    debug!(?config, "configuration loaded");

    let table = app::load_tax_table(&config)?;
    let runner = AccrualRunner::new(table, SystemClock);

    println!("Type `help` for commands.");
    app::run(runner, cli.initial_commands(), config.notice_duration())
        .await
        .context("live earnings session failed")?;

    logging::disable_file_logging();
    Ok(())
}
