use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::{
    EnvFilter,
    Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "warn";

// --- Formatter ---

const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// `HH:MM:SS.mmm LEVEL target fields`, local time, colored when the writer
/// supports it.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            let color = level_color(*meta.level());
            write!(
                writer,
                "{DIM}{timestamp}{RESET} {color}{:>5}{RESET} {CYAN}{}{RESET} ",
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{timestamp} {:>5} {} ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

/// A MakeWriter that can be pointed at a file after initialization.
/// While no file is set, all writes are discarded.
#[derive(Clone)]
struct FileSlot(Arc<Mutex<Option<File>>>);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// --- Runtime controls ---

/// Swaps the filter behind one reload layer.
type Reload = Box<dyn Fn(EnvFilter) -> Result<(), reload::Error> + Send + Sync>;

/// Handles captured at init time for adjusting logging while running.
struct LogControls {
    level: Reload,
    stderr_gate: Reload,
    file: Arc<Mutex<Option<File>>>,
}

fn reloader<S>(handle: reload::Handle<EnvFilter, S>) -> Reload
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter| handle.reload(filter))
}

static CONTROLS: OnceLock<LogControls> = OnceLock::new();

fn controls() -> Result<&'static LogControls> {
    CONTROLS
        .get()
        .ok_or_else(|| anyhow::anyhow!("logging not yet initialized"))
}

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

// --- Public API ---

/// Changes the active log filter at runtime.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace")
/// or any full EnvFilter directive.
pub fn set_log_level(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}"))?;
    (controls()?.level)(filter).map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
}

/// Shows or hides stderr log output without affecting file logging.
pub fn set_stderr_enabled(enabled: bool) -> Result<()> {
    // "trace" passes everything through; the global filter is still the ceiling.
    let gate = EnvFilter::new(if enabled { "trace" } else { "off" });
    (controls()?.stderr_gate)(gate).map_err(|e| anyhow::anyhow!("stderr reload failed: {e}"))
}

/// Starts appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let slot = &controls()?.file;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
    Ok(())
}

/// Flushes and closes the current log file, if any.
pub fn disable_file_logging() {
    if let Some(controls) = CONTROLS.get() {
        let mut slot = controls.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut file) = slot.take() {
            let _ = file.flush();
        }
    }
}

/// Initializes logging. Call once at startup; later calls do nothing.
///
/// Stdout belongs to the earnings display, so records go to stderr (colored
/// on a terminal) and, once `enable_file_logging` is called, to a file. The
/// level is `warn` unless `RUST_LOG` says otherwise.
pub fn init_default_logging() {
    let file = Arc::new(Mutex::new(None));

    let (level_filter, level_handle) = reload::Layer::new(make_filter());
    let (stderr_gate, stderr_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .with_filter(stderr_gate);
    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(FileSlot(Arc::clone(&file)));

    let installed = tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok();
    if installed {
        let _ = CONTROLS.set(LogControls {
            level: reloader(level_handle),
            stderr_gate: reloader(stderr_handle),
            file,
        });
    }
}

/// Logs a background task failure with context.
pub fn log_task_error(
    task_name: &'static str,
    result: Result<()>,
) {
    if let Err(error) = result {
        error!(task = task_name, ?error, "background task failed");
    }
}
