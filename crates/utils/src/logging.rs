//! provides logging helpers

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Environment variable pointing at a log file. When unset, logs go to stderr.
pub const LOG_PATH_ENV_VAR: &str = "TPU_WEBHOOK_LOG_PATH";

/// Number of rotated log files kept on disk.
const MAX_LOG_FILES: usize = 3;

/// Builds the formatting layer used by every binary in the workspace.
///
/// With a `log_path` the layer writes to a daily-rotated file through a
/// non-blocking writer; the returned [`WorkerGuard`] must be kept alive for
/// as long as logs should be flushed. Without one it writes to stderr.
pub fn get_fmt_layer<S>(
    log_path: Option<String>,
) -> (Box<dyn Layer<S> + Send + Sync + 'static>, Option<WorkerGuard>)
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if let Some(appender) = log_path.as_deref().and_then(rolling_appender) {
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let fmt_layer = layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        return (fmt_layer, Some(guard));
    }

    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .boxed();
    (fmt_layer, None)
}

fn rolling_appender(log_path: &str) -> Option<RollingFileAppender> {
    let path = Path::new(log_path);
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty())?;
    let file_name = path.file_name()?.to_str()?;

    match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
    {
        Ok(appender) => Some(appender),
        Err(e) => {
            eprintln!(
                "failed to create rolling file appender at {log_path}: {e}, falling back to stderr"
            );
            None
        }
    }
}
