use crate::models::LoggingConfig;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup logging with rotating file appender.
///
/// Logs are written to the specified directory with daily rotation.
///
/// # Arguments
/// * `log_dir` - Directory for log files (e.g., "logs")
/// * `log_prefix` - Prefix for log files (e.g., "game-client")
/// * `debug_mode` - If true, use debug level; otherwise use info level
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    setup_logging_with_console(log_dir, log_prefix, debug_mode, false)
}

/// Setup logging with optional console output.
///
/// # Arguments
/// * `log_dir` - Directory for log files
/// * `log_prefix` - Prefix for log files
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `console_output` - If true, also log to console
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging_with_console(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    ensure_log_dir(log_dir)?;

    // Create daily rotating file appender
    let file_appender = rolling::daily(log_dir, log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let registry = tracing_subscriber::registry()
        .with(env_filter(debug_mode))
        .with(file_layer);

    if console_output {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false);

        registry
            .with(console_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        registry
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_dir,
        log_prefix,
        debug_mode,
        console_output
    );

    Ok(guard)
}

/// Setup logging from the `logging` section of the client config.
pub fn setup_from_config(
    config: &LoggingConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    setup_logging_with_console(&config.dir, &config.prefix, config.debug, config.console)
}

fn ensure_log_dir(log_dir: &str) -> Result<()> {
    let log_path = Utf8PathBuf::from(log_dir);
    if !log_path.exists() {
        fs::create_dir_all(&log_path)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise the debug flag picks the level.
fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single log record as seen by application code. Never persisted here;
/// the subscriber decides where the text goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

/// Module-tagged logger for UI code.
///
/// Each call emits a `tracing` event and hands back the entry it produced.
///
/// # Example
/// ```ignore
/// let log = Logger::for_module("settings");
/// log.info("Volume changed");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Logger {
    module: Option<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_module(module: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
        }
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn debug(&self, message: impl Into<String>) -> LogEntry {
        self.log(LogLevel::Debug, message.into())
    }

    pub fn info(&self, message: impl Into<String>) -> LogEntry {
        self.log(LogLevel::Info, message.into())
    }

    pub fn warn(&self, message: impl Into<String>) -> LogEntry {
        self.log(LogLevel::Warn, message.into())
    }

    pub fn error(&self, message: impl Into<String>) -> LogEntry {
        self.log(LogLevel::Error, message.into())
    }

    fn log(&self, level: LogLevel, message: String) -> LogEntry {
        let module = self.module.as_deref().unwrap_or("app");
        match level {
            LogLevel::Debug => tracing::debug!(module, "{}", message),
            LogLevel::Info => tracing::info!(module, "{}", message),
            LogLevel::Warn => tracing::warn!(module, "{}", message),
            LogLevel::Error => tracing::error!(module, "{}", message),
        }

        LogEntry {
            level,
            message,
            timestamp: Utc::now(),
            module: self.module.clone(),
        }
    }
}
