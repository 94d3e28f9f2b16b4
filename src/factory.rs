//! Factory: fully configured emitters with one standard-stream sink.
//!
//! `Env::Pro` selects the compact JSON encoder and `Env::Dev` the tree
//! renderer. Formatter params are registered on the formatter before the
//! emitter is handed out.

use crate::config::LoggingConfig;
use crate::error::LogError;
use crate::logger::{Logger, ScopeDefaults};
use crate::registry::EmitterRegistry;
use crate::render::{CompactEncoder, ContextParams, Formatter, TreeOptions, TreeRenderer};
use crate::sink::{Sink, StreamSink};
use crate::types::Severity;
use crate::value::ContextMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Execution environment selecting the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    /// Production: compact JSON lines
    #[default]
    Pro,
    /// Development: colored tree output
    Dev,
}

impl FromStr for Env {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pro" => Ok(Env::Pro),
            "dev" => Ok(Env::Dev),
            other => Err(LogError::Configuration(format!(
                "env must be 'pro' or 'dev', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Env::Pro => f.write_str("pro"),
            Env::Dev => f.write_str("dev"),
        }
    }
}

/// Emitter settings beyond the formatter choice.
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub level: Severity,
    /// Persistent context of the new emitter
    pub context: ContextMap,
    pub tree: TreeOptions,
    pub datefmt: Option<String>,
    pub scope: ScopeDefaults,
    pub output: StreamSink,
    /// Registry to join instead of the process-wide one
    pub registry: Option<Arc<EmitterRegistry>>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: Severity::Debug,
            context: ContextMap::new(),
            tree: TreeOptions::default(),
            datefmt: None,
            scope: ScopeDefaults::default(),
            output: StreamSink::Stdout,
            registry: None,
        }
    }
}

impl LoggerOptions {
    pub fn from_config(config: &LoggingConfig) -> Result<Self, LogError> {
        Ok(Self {
            level: config.severity()?,
            context: ContextMap::new(),
            tree: config.tree_options(),
            datefmt: config.datefmt.clone(),
            scope: ScopeDefaults {
                success_message: config.success_msg.clone(),
                failure_message: config.failure_msg.clone(),
                suppress_errors: config.suppress_errors,
            },
            output: config.output_stream()?,
            registry: None,
        })
    }
}

/// Formatter for `env` with `params` registered on it. Fails on an invalid `datefmt`.
pub fn build_formatter(
    env: Env,
    params: &ContextMap,
    options: &LoggerOptions,
) -> Result<Box<dyn Formatter>, LogError> {
    let formatter: Box<dyn Formatter> = match env {
        Env::Pro => {
            let mut encoder = CompactEncoder::new();
            if let Some(datefmt) = &options.datefmt {
                encoder = encoder.with_datefmt(datefmt.clone())?;
            }
            Box::new(with_params(encoder, params))
        }
        Env::Dev => {
            let mut renderer = TreeRenderer::new(options.tree);
            if let Some(datefmt) = &options.datefmt {
                renderer = renderer.with_datefmt(datefmt.clone())?;
            }
            Box::new(with_params(renderer, params))
        }
    };
    Ok(formatter)
}

fn with_params<F: ContextParams>(mut formatter: F, params: &ContextMap) -> F {
    for (name, default) in params {
        formatter.accept_context_param(name, default.clone());
    }
    formatter
}

/// Emitter named `name` with one standard-stream sink whose formatter is chosen by `env`.
pub fn get_logger(
    name: impl Into<String>,
    env: Env,
    formatter_params: ContextMap,
    options: LoggerOptions,
) -> Result<Logger, LogError> {
    let formatter = build_formatter(env, &formatter_params, &options)?;
    let sink = Sink::boxed(Box::new(options.output), formatter);
    let mut builder = Logger::builder(name)
        .level(options.level)
        .context_map(options.context)
        .scope_defaults(options.scope)
        .sink(sink);
    if let Some(registry) = &options.registry {
        builder = builder.registry(registry);
    }
    Ok(builder.build())
}

/// Emitter built from a loaded configuration. Invalid settings are rejected
/// before anything is constructed.
pub fn from_config(name: impl Into<String>, config: &LoggingConfig) -> Result<Logger, LogError> {
    let config = config.clone().validated()?;
    let options = LoggerOptions::from_config(&config)?;
    get_logger(name, config.env()?, config.formatter_params(), options)
}
