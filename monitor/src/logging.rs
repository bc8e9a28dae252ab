//! Tracing setup for the monitor process

use std::path::Path;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_FILE_NAME: &str = "dropwatch.log";
const MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
}

/// Initialize logging to stderr, plus a rolling file when `log_dir` is set.
///
/// Returns the file writer guard (must be kept alive to flush) and, if the
/// file could not be set up, the reason so it can be logged once tracing is up.
pub fn init_logging(log_dir: Option<&Path>) -> (Option<WorkerGuard>, Option<String>) {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(stderr_layer)
            .init();
        return (None, None);
    };

    let appender = std::fs::create_dir_all(dir).and_then(|_| {
        BasicRollingFileAppender::new(
            dir.join(LOG_FILE_NAME),
            RollingConditionBasic::new().daily().max_size(MAX_LOG_FILE_BYTES),
            MAX_LOG_FILES,
        )
    });

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr_layer)
                .with(file_layer)
                .init();
            (Some(guard), None)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr_layer)
                .init();
            (None, Some(format!("cannot open log file in {:?}: {}", dir, e)))
        }
    }
}
