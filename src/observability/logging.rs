use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

const DEFAULT_DIRECTIVE: &str = "geo_enricher=info";

/// Non-blocking daily-rotated file writer under `config.directory`.
/// Creating the directory is part of building the appender.
pub fn file_writer(config: &LoggingConfig) -> Result<(NonBlocking, WorkerGuard), InitError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_name)
        .build(&config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initializes the logging system with console and file output.
///
/// The console layer writes to stderr because stdout carries the progress
/// line. If the log directory is unusable the run continues with console
/// logging only and `None` is returned. Otherwise keep the returned guard
/// alive for the whole run; dropping it flushes the file writer.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard, file_error) = match file_writer(config) {
        Ok((writer, guard)) => (Some(fmt::layer().json().with_writer(writer)), Some(guard), None),
        Err(e) => (None, None, Some(e)),
    };
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // A subscriber may already be installed (tests, embedding callers)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if let Some(e) = file_error {
        warn!(
            directory = %config.directory,
            error = %e,
            "Log directory unavailable, logging to console only"
        );
    }

    guard
}
