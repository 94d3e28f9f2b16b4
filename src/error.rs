//! Error types for the ctxlog structured logging layer.
//!
//! Rendering is total and has no error type. Errors only surface at
//! construction and bind time, when entering a scope, or from the
//! configuration and CLI edges.

use thiserror::Error;

/// Errors raised by emitter construction, adapters, scopes and configuration.
#[derive(Debug, Error)]
pub enum LogError {
    /// A required capability or setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A scope was entered on an emitter that already has one in flight.
    #[error("Scope already active on emitter '{0}'")]
    ScopeAlreadyActive(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for LogError {
    fn from(err: config::ConfigError) -> Self {
        LogError::Configuration(err.to_string())
    }
}
