//! Logging setup for applications embedding the gateway client.
//!
//! The library itself only emits `tracing` events; nothing is printed until
//! the application installs a subscriber, either its own or one of these.

use std::str::FromStr;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const MODE_VAR: &str = "IGD_LOG_MODE";
const LEVEL_VAR: &str = "IGD_LOG_LEVEL";

/// Output style of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggingMode {
    /// Install nothing
    #[default]
    Silent,
    /// One compact line per event on stderr, `info` and above
    Development,
    /// Multi-line events with source locations, `debug` and above
    Debug,
}

impl FromStr for LoggingMode {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LoggingMode::Silent),
            "development" | "dev" => Ok(LoggingMode::Development),
            "debug" => Ok(LoggingMode::Debug),
            other => Err(LoggingError::InvalidEnv(format!(
                "{}={} (expected silent, development or debug)",
                MODE_VAR, other
            ))),
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Install a global subscriber for `mode`.
///
/// The level filter comes from `IGD_LOG_LEVEL`, then `RUST_LOG`, then the
/// mode's default. Fails if a global subscriber is already set.
///
/// ```rust,no_run
/// use upnp_igd::logging::{init_logging, LoggingMode};
///
/// init_logging(LoggingMode::Development).unwrap();
/// ```
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Install a subscriber chosen by `IGD_LOG_MODE`.
///
/// An unset variable means [`LoggingMode::Silent`]; an unrecognized value
/// is an error.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var(MODE_VAR) {
        Ok(value) => value.parse()?,
        Err(_) => LoggingMode::Silent,
    };

    init_logging(mode)
}

/// Whether a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let (source, directives) = if let Ok(level) = std::env::var(LEVEL_VAR) {
        (LEVEL_VAR, level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        ("RUST_LOG", rust_log)
    } else {
        return Ok(EnvFilter::new(default_level));
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidEnv(format!("{}={}: {}", source, directives, e)))
}
