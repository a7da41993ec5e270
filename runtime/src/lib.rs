//! Process bootstrap shared by the pressroom binaries.

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging setup for one binary.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// File name prefix for rolled log files (`<prefix>.YYYY-MM-DD`).
    pub service: &'static str,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Directory for daily-rolled log files; console only when `None`.
    pub log_dir: Option<PathBuf>,
    /// Write console logs to stderr, leaving stdout to command output.
    pub stderr: bool,
}

impl LoggingOptions {
    /// Options for `service`, taking the log directory from `LOG_DIR`.
    pub fn from_env(service: &'static str) -> Self {
        let log_dir = env::var("LOG_DIR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            service,
            default_filter: "info".to_string(),
            log_dir,
            stderr: false,
        }
    }
}

/// Keeps the background file writer alive; drop it last.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber: console always, a rolling file when
/// `log_dir` is set.
pub fn init_logging(options: &LoggingOptions) -> Result<LoggingGuard> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(options.default_filter.as_str()))
    };

    let console_layer = if options.stderr {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    } else {
        fmt::layer().with_target(true).with_filter(filter()).boxed()
    };

    let (file_layer, guard) = match options.log_dir.as_ref() {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log dir {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, options.service);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some(dir) = options.log_dir.as_ref() {
        tracing::info!("{} logs rolling daily under {}", options.service, dir.display());
    }

    Ok(LoggingGuard { _file: guard })
}
