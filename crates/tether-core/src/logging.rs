#![forbid(unsafe_code)]

//! Logging configuration.
//!
//! Logging is controlled by an explicit [`LogConfig`] value rather than a
//! process-wide mutable switch. The application builds one (directly or from
//! the environment) and calls `LogConfig::install` once at startup; the
//! library itself only emits `tracing` events. Installing a subscriber
//! needs the `subscriber` feature, which pulls in `tracing-subscriber`.
//!
//! # Environment
//!
//! | Variable            | Values                                   | Default  |
//! |---------------------|------------------------------------------|----------|
//! | `TETHER_LOG`        | `1`, `true`, `yes`, `on` enable          | disabled |
//! | `TETHER_LOG_LEVEL`  | `off`, `error`, `warn`, `info`, `debug`, `trace` | `info` |
//! | `TETHER_LOG_FORMAT` | `pretty`, `json`                         | `pretty` |
//! | `TETHER_LOG_FILTER` | `tracing-subscriber` env-filter directives | unset  |
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Bad level | Unknown `TETHER_LOG_LEVEL` | [`LogConfigError::InvalidLevel`] |
//! | Bad format | Unknown `TETHER_LOG_FORMAT` | [`LogConfigError::InvalidFormat`] |
//! | Bad directives | Unparsable filter | [`LogConfigError::InvalidFilter`] on install |
//! | Second install | A global subscriber already exists | [`LogConfigError::AlreadyInstalled`] |

use std::fmt;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
#[cfg(feature = "subscriber")]
use tracing_subscriber::EnvFilter;

const ENV_ENABLED: &str = "TETHER_LOG";
const ENV_LEVEL: &str = "TETHER_LOG_LEVEL";
const ENV_FORMAT: &str = "TETHER_LOG_FORMAT";
const ENV_FILTER: &str = "TETHER_LOG_FILTER";

/// Errors from building or installing a logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogConfigError {
    /// A level string was not recognized.
    InvalidLevel(String),
    /// A format string was not recognized.
    InvalidFormat(String),
    /// Filter directives could not be parsed.
    InvalidFilter(String),
    /// A global subscriber was already installed.
    AlreadyInstalled(String),
}

impl fmt::Display for LogConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(f, "invalid log level: {level}"),
            Self::InvalidFormat(format) => write!(f, "invalid log format: {format}"),
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {msg}"),
            Self::AlreadyInstalled(msg) => write!(f, "logging already installed: {msg}"),
        }
    }
}

impl std::error::Error for LogConfigError {}

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = LogConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(LogConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Logging configuration, passed explicitly to `install`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Whether a subscriber is installed at all. Default: false.
    pub enabled: bool,
    /// Maximum level when no `filter` is given. Default: `INFO`.
    pub level: LevelFilter,
    /// Output format. Default: pretty.
    pub format: LogFormat,
    /// Env-filter directives; overrides `level` when set.
    pub filter: Option<String>,
    /// Include the event target in each line. Default: true.
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: LevelFilter::INFO,
            format: LogFormat::Pretty,
            filter: None,
            with_target: true,
        }
    }
}

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_level(value: &str) -> Result<LevelFilter, LogConfigError> {
    value
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| LogConfigError::InvalidLevel(value.to_string()))
}

impl LogConfig {
    /// Turn logging on or off.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the maximum level.
    #[must_use]
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Use explicit env-filter directives such as `"tether_core=trace"`.
    #[must_use]
    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    /// Show or hide event targets.
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self, LogConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build a configuration using a custom environment lookup.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, LogConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = get_env(ENV_ENABLED) {
            config.enabled = env_flag(&value);
        }
        if let Some(value) = get_env(ENV_LEVEL) {
            config.level = parse_level(&value)?;
        }
        if let Some(value) = get_env(ENV_FORMAT) {
            config.format = value.parse()?;
        }
        if let Some(value) = get_env(ENV_FILTER).filter(|v| !v.trim().is_empty()) {
            config.filter = Some(value);
        }
        Ok(config)
    }

    /// The filter directives `install` uses.
    #[must_use]
    pub fn directives(&self) -> String {
        match &self.filter {
            Some(filter) => filter.clone(),
            None => self.level.to_string().to_ascii_lowercase(),
        }
    }

    /// Parse [`directives`](Self::directives) into a filter.
    #[cfg(feature = "subscriber")]
    pub fn env_filter(&self) -> Result<EnvFilter, LogConfigError> {
        EnvFilter::try_new(self.directives())
            .map_err(|err| LogConfigError::InvalidFilter(err.to_string()))
    }

    /// Install a global `tracing` subscriber for this configuration.
    ///
    /// Requires the `subscriber` feature.
    ///
    /// Returns `Ok(false)` without touching global state when logging is
    /// disabled, `Ok(true)` once a subscriber is installed.
    #[cfg(feature = "subscriber")]
    pub fn install(&self) -> Result<bool, LogConfigError> {
        if !self.enabled {
            return Ok(false);
        }
        let filter = self.env_filter()?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.with_target);
        let result = match self.format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        result.map_err(|err| LogConfigError::AlreadyInstalled(err.to_string()))?;
        tracing::debug!(directives = %self.directives(), format = ?self.format, "logging installed");
        Ok(true)
    }
}
