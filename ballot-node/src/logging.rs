use std::{fs, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::filter_fn, fmt, prelude::*, EnvFilter};

use ballot_common::{BallotError, Result};

/// Target carrying the `EVENT:*` protocol lines.
pub const CONSENSUS_TARGET: &str = "consensus";

/// Installs the global subscriber.
///
/// Everything goes to stderr through `RUST_LOG` (default `info`). With a log
/// file, consensus events are written there instead. Keep the returned guard
/// alive or buffered events are lost on exit.
pub fn init(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path.file_name().ok_or_else(|| {
                BallotError::Config(format!("log file {} has no file name", path.display()))
            })?;
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            fs::create_dir_all(dir)?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter_fn(|metadata| metadata.target() == CONSENSUS_TARGET));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let to_file = file_layer.is_some();
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_filter(filter_fn(move |metadata| {
            !(to_file && metadata.target() == CONSENSUS_TARGET)
        }));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| BallotError::Config(format!("logging already initialised: {e}")))?;

    Ok(guard)
}
