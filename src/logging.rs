use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Variable holding the log filter, e.g. `MINDWELL_LOG=mindwell=debug`.
pub const LOG_ENV: &str = "MINDWELL_LOG";

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to `<data_dir>/mindwell/mindwell.log` so the TUI owns the terminal.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_file() -> Result<WorkerGuard> {
  let dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("mindwell");

  std::fs::create_dir_all(&dir).map_err(|e| eyre!("Failed to create log directory: {}", e))?;

  let appender = tracing_appender::rolling::never(dir, "mindwell.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

/// Log to stderr, for one-shot subcommands.
pub fn init_stderr() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
