//! provides logging helpers

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{self};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// initiate the global tracing subscriber
///
/// Logs go to stderr, or to a daily-rotated file when `log_path` is set. The
/// returned guard flushes the file writer and must outlive the server.
pub fn init(log_path: Option<String>) -> Option<WorkerGuard> {
    let (fmt_layer, guard) = utils::logging::get_fmt_layer(log_path);

    let env_filter = filter::EnvFilter::builder()
        .with_default_directive(filter::LevelFilter::INFO.into())
        .from_env_lossy();

    registry().with(fmt_layer.with_filter(env_filter)).init();
    guard
}
