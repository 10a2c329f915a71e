use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use taskdeck_core::AppConfig;

/// Route tracing output to a daily-rotated file under the data directory.
///
/// The TUI owns the terminal, so logs never go to stderr. Verbosity is
/// controlled with the `TASKDECK_LOG` environment variable (standard
/// `EnvFilter` syntax, default `info`). The returned guard must be kept
/// alive for the duration of the process or buffered lines are dropped.
pub fn init(config: &AppConfig) -> Result<WorkerGuard> {
    let log_dir = config.log_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "taskdeck.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("TASKDECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so repeated initialization (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
