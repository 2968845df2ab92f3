//! Logging initialization
//!
//! Console output controlled by `RUST_LOG`, with an optional daily-rolling
//! file alongside. Callers initialize once at startup; repeated calls are
//! harmless no-ops because a global subscriber can only be set once.

use std::path::Path;

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

// Keeps the non-blocking writer's worker thread alive for the process
// lifetime.
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize console-only logging.
pub fn init_logging() {
    let _ = Registry::default()
        .with(env_filter())
        .with(fmt::layer())
        .try_init();
}

/// Initialize console logging plus a daily-rolling log file under `log_dir`.
pub fn init_logging_with_file(log_dir: impl AsRef<Path>) -> Result<()> {
    let file_appender = rolling::daily(log_dir.as_ref(), "floorsheet-collector");
    let (file_writer, guard) = non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    Registry::default()
        .with(env_filter())
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
