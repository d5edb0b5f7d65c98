use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::AppError;

const LOG_FILE: &str = "fltr.log";

/// Install the global subscriber writing to a daily log file in `log_dir`.
///
/// The terminal belongs to the UI, so nothing is written to stdout.
/// `RUST_LOG` takes precedence over `level`. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init(level: &str, log_dir: &Path) -> Result<WorkerGuard, AppError> {
    std::fs::create_dir_all(log_dir).map_err(|source| AppError::LogDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,fltr={level},fltr_filters={level},fltr_gateway={level},fltr_ui={level}"))
    });

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(non_blocking)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(file_layer).init();

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
