use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directory holding the log files: `<config_dir>/hhat/logs`
pub fn logs_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(anyhow::anyhow!("Could not find config directory"))?
        .join("hhat");
    Ok(config_dir.join("logs"))
}

/// `hhat-YYYY-MM-DD-HH-MM-SS.log` for the current local time
pub fn log_file_name() -> String {
    format!("hhat-{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize tracing with file-based logging
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// Returns the path of the log file.
pub fn init_logging() -> Result<PathBuf> {
    init_logging_in(&logs_dir()?)
}

pub fn init_logging_in(logs_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(logs_dir)?;

    let log_filename = log_file_name();
    let log_path = logs_dir.join(&log_filename);

    let file_appender = tracing_appender::rolling::never(logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // Default to INFO, RUST_LOG overrides
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    // Keep the writer alive for the rest of the program
    std::mem::forget(guard);

    Ok(log_path)
}
