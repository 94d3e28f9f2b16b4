//! Crate diagnostics
//!
//! The crate reports its own lifecycle events (registry changes, scope entry
//! and exit, sink write failures, missing config files) through `tracing`.
//! `init_diagnostics` installs a subscriber for them on stderr so they never
//! mix with records written to stdout sinks.

use crate::error::LogError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a full `EnvFilter` directive.
pub const DIAGNOSTICS_ENV: &str = "CTXLOG_DIAG";

/// Diagnostics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// trace, debug, info, warn, error, off
    #[serde(default = "default_level")]
    pub level: String,

    /// json or text
    #[serde(default = "default_format")]
    pub format: String,

    /// ANSI colors (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(
            self.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(format!("invalid diagnostics level '{}'", self.level));
        }
        if self.format != "json" && self.format != "text" {
            return Err(format!(
                "invalid diagnostics format '{}' (must be 'json' or 'text')",
                self.format
            ));
        }
        Ok(())
    }
}

/// Install the diagnostics subscriber. `CTXLOG_DIAG` overrides the configured level.
///
/// Fails if the configuration is invalid or a global subscriber is already set.
pub fn init_diagnostics(config: &DiagnosticsConfig) -> Result<(), LogError> {
    config.validate().map_err(LogError::Configuration)?;
    let filter = build_env_filter(config)?;
    let base_subscriber = Registry::default().with(filter);

    let installed = if config.format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.map_err(|e| LogError::Configuration(format!("Failed to install diagnostics: {}", e)))
}

fn build_env_filter(config: &DiagnosticsConfig) -> Result<EnvFilter, LogError> {
    if let Ok(filter) = EnvFilter::try_from_env(DIAGNOSTICS_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| LogError::Configuration(format!("Invalid diagnostics level: {}", e)))
}
