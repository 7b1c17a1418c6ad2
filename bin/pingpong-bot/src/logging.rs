use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

/// Installs the three log sinks spec §6 "Logs" calls for: a pretty stream
/// to stderr, plus two append-only rolling files under `${DATA_PATH}/` —
/// one filtered to WARN and above, one to DEBUG and above. Returns the
/// non-blocking writer guards; they must be held for the process's
/// lifetime, since dropping one flushes and stops its worker thread.
pub fn init(data_path: &Path) -> eyre::Result<(WorkerGuard, WorkerGuard)> {
    std::fs::create_dir_all(data_path)?;

    let warn_appender = tracing_appender::rolling::daily(data_path, "pingpong-bot.warn.log");
    let (warn_writer, warn_guard) = tracing_appender::non_blocking(warn_appender);
    let warn_layer = fmt::layer().with_writer(warn_writer).with_ansi(false).with_filter(EnvFilter::new("warn"));

    let debug_appender = tracing_appender::rolling::daily(data_path, "pingpong-bot.debug.log");
    let (debug_writer, debug_guard) = tracing_appender::non_blocking(debug_appender);
    let debug_layer = fmt::layer().with_writer(debug_writer).with_ansi(false).with_filter(EnvFilter::new("debug"));

    let stderr_layer = fmt::layer().pretty().with_writer(std::io::stderr).with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(stderr_layer).with(warn_layer).with(debug_layer).init();

    Ok((warn_guard, debug_guard))
}
