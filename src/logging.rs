//! Logging setup for the `qkd-hal` binary.
//!
//! Events go to stderr through a `tracing-subscriber` fmt layer, so command
//! output on stdout stays clean. `RUST_LOG` wins over the configured level:
//!
//! ```no_run
//! use qkd_hal::logging::{self, LogFormat, LoggingConfig};
//! use tracing::Level;
//!
//! # fn main() -> anyhow::Result<()> {
//! logging::init(LoggingConfig::new(Level::DEBUG).with_format(LogFormat::Json))?;
//! tracing::info!("bench ready");
//! # Ok(())
//! # }
//! ```

use std::io;

use anyhow::{anyhow, Result};
use tracing::{dispatcher, level_filters::LevelFilter, Level};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Output format of log events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored when stderr is a terminal
    Pretty,
    /// One JSON object per event
    Json,
}

/// Logging options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Source locations in each event
    pub with_locations: bool,
    /// Colored output (pretty format only)
    pub colored: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Pretty,
            with_locations: false,
            colored: true,
        }
    }
}

impl LoggingConfig {
    /// Options with the given default level.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Parse the level from a name such as `"debug"`.
    pub fn from_level_name(level: &str) -> Result<Self> {
        Ok(Self::new(level_from_name(level)?))
    }

    /// Set output format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Colored or plain pretty output
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }
}

/// Install the global subscriber.
///
/// Calling it again once a subscriber is installed is a no-op.
pub fn init(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_file(config.with_locations)
            .with_line_number(config.with_locations)
            .with_ansi(config.colored)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_file(config.with_locations)
            .with_line_number(config.with_locations)
            .with_filter(filter)
            .boxed(),
    };

    match Registry::default().with(layer).try_init() {
        Ok(()) => Ok(()),
        // Another subscriber won the race (tests, embedding applications)
        Err(_) if dispatcher::has_been_set() => Ok(()),
        Err(e) => Err(anyhow!("failed to initialize logging: {}", e)),
    }
}

/// Level from its name, case-insensitive (`"warn"`, `"DEBUG"`, ...).
fn level_from_name(name: &str) -> Result<Level> {
    name.parse::<Level>().map_err(|_| {
        anyhow!(
            "invalid log level '{}', expected one of: trace, debug, info, warn, error",
            name
        )
    })
}
