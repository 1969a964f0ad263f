//! Tracing subscriber setup.
//!
//! Console logs go to stderr and default to `warn` so the interactive screen stays
//! readable; `RUST_LOG` overrides the filter. With `AQI_LOG_DIR` set, an additional
//! daily-rolling file receives the same events.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const DEFAULT_DIRECTIVE: &str = "warn";
const LOG_FILE_PREFIX: &str = "aqi-tracker.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file sink on drop and must be kept alive for the
/// lifetime of the program.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter());
            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .init();
            Some(guard)
        },
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        },
    }
}
