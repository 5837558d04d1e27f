use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::config::{AppConfig, LogFormat};

/// Builds the filter directive used when `RUST_LOG` is not set.
pub fn default_filter_directive(log_level: &str) -> String {
    format!("{log_level},sqlx::query=warn")
}

/// Installs the global tracing subscriber.
///
/// Stdout gets either human-readable or JSON output depending on
/// `log_format`. When `log_dir` is configured, a daily rolling JSON file is
/// written as well; the returned guard must be held for the lifetime of the
/// process so buffered file output gets flushed.
pub fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter_directive(&config.log_level)));

    let stdout_layer = match config.log_format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stdout).boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stdout)
            .json()
            .boxed(),
    };

    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, "simplemon.log"));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false) // No ANSI colors in file
                .json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
