//! Telemetry and tracing utilities
//!
//! The registry only emits `tracing` events; a host that already installs a
//! subscriber needs nothing from here. These helpers cover binaries and tests
//! that do not.
//!
//! ```rust,ignore
//! use meladai_registry::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! init_subscriber(config)?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::{RegistryError, Result};

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format
    Json,
    /// Compact JSON format
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" | "json_compact" | "compact" => Ok(Self::JsonCompact),
            other => Err(RegistryError::Telemetry(format!(
                "Invalid log format: {other}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Let `RUST_LOG` override `log_level` when set
    pub respect_rust_log: bool,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            respect_rust_log: true,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Create a debug configuration
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    /// Directives used when `RUST_LOG` is unset or ignored.
    fn default_directives(&self) -> String {
        let level = level_str(self.log_level);
        format!("{level},meladai_registry={level}")
    }

    fn filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.default_directives());
        if self.respect_rust_log {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
        } else {
            fallback()
        }
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    respect_rust_log: Option<bool>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self> {
        let level = match level.trim().to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                return Err(RegistryError::Telemetry(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn respect_rust_log(mut self, respect: bool) -> Self {
        self.respect_rust_log = Some(respect);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            respect_rust_log: self.respect_rust_log.unwrap_or(true),
        }
    }
}

fn level_str(level: tracing::Level) -> &'static str {
    match level {
        tracing::Level::TRACE => "trace",
        tracing::Level::DEBUG => "debug",
        tracing::Level::INFO => "info",
        tracing::Level::WARN => "warn",
        tracing::Level::ERROR => "error",
    }
}

/// Install a global fmt subscriber.
///
/// An already-installed global subscriber is not an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<()> {
    let filter = config.filter();

    let init_result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init(),
        OutputFormat::JsonCompact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .flatten_event(true)
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    match init_result {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("global default trace dispatcher has already been set") {
                Ok(())
            } else {
                Err(RegistryError::Telemetry(format!(
                    "Failed to initialize tracing: {e}"
                )))
            }
        }
    }
}

/// Initialize tracing subscriber with default configuration
pub fn init_default() -> Result<()> {
    init_subscriber(SubscriberConfig::default())
}

/// Initialize tracing subscriber from environment variables
///
/// - `MELADAI_LOG_LEVEL`: trace, debug, info, warn, error
/// - `MELADAI_LOG_FORMAT`: text, json, json-compact
pub fn init_from_env() -> Result<()> {
    init_subscriber(config_from_lookup(|key| std::env::var(key).ok())?)
}

fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<SubscriberConfig> {
    let mut builder = SubscriberConfig::builder();
    if let Some(level) = lookup("MELADAI_LOG_LEVEL") {
        builder = builder.log_level_str(&level)?;
    }
    if let Some(format) = lookup("MELADAI_LOG_FORMAT") {
        builder = builder.output_format(format.parse()?);
    }
    Ok(builder.build())
}
