//! Logging setup: console output plus an optional rolling log file.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Initialize logging.
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to `log_level`.
/// With `log_dir`, logs are also written to `<log_dir>/symup.log.<date>`.
pub fn init(log_level: &str, log_dir: Option<&Path>) {
    let console_layer = fmt::layer().with_target(false).with_filter(filter(log_level));

    let file_layer = log_dir.and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("[WARN] Failed to create log directory {:?}: {}", dir, e);
            return None;
        }
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "symup.log");
        Some(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_appender)
                .with_filter(filter(log_level)),
        )
    });

    match file_layer {
        Some(file_layer) => {
            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .init();
            tracing::debug!("File logging enabled: {:?}", log_dir);
        }
        None => {
            tracing_subscriber::registry().with(console_layer).init();
        }
    }
}
