//! Logging setup with file output and size-based rotation.
//!
//! Writes to `rotating-gear.log` in the user config directory, rotating at
//! 10 MB. Set `DEBUG_LOGGING=1` for debug output from this crate.

use std::path::{Path, PathBuf};

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::context::APP_NAME;

const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Install the global subscriber: stdout plus a rolling log file.
///
/// The returned guard must be held until exit so buffered lines are flushed.
/// Falls back to stdout only when the log file cannot be opened.
pub fn init(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let Some(log_dir) = log_dir.map(Path::to_path_buf).or_else(default_log_dir) else {
        init_stdout_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "Failed to create log directory {:?}: {}, using stdout only",
            log_dir, e
        );
        init_stdout_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join(format!("{APP_NAME}.log"));
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Logging initialized");

    Some(guard)
}

fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(debug_logging, "Logging initialized (stdout only)");
}

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new("info,rotating_gear=debug")
    } else {
        EnvFilter::new("info")
    }
}

fn default_log_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME))
}
