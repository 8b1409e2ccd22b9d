//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing either to the configured
//! log file (non-blocking) or to stderr. `RUST_LOG` takes precedence over the
//! configured level.

use crate::config::{LogLevel, LoggingConfig};
use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that flushes buffered log lines when dropped.
///
/// Keep it alive until the process is about to exit.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.as_filter().into())
        .from_env_lossy()
}

/// Install the global subscriber described by `config`.
pub fn init(config: &LoggingConfig) -> std::io::Result<LogGuard> {
    let (writer, guard) = if config.to_stderr() {
        tracing_appender::non_blocking(std::io::stderr())
    } else {
        if let Some(parent) = config.file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.file)?;
        tracing_appender::non_blocking(file)
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(config.level))
        .with(layer)
        .init();

    Ok(LogGuard { _guard: guard })
}
