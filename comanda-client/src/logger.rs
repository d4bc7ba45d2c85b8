//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level. With a log directory, records
//! also go to a daily rolling file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Keep the returned guard alive until exit, dropping it flushes the file writer.
pub fn init_logger(level: &str, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,comanda_client={level},shared={level}")));

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, "comanda.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    // A second init (tests, embedding) is harmless
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init();

    guard
}
