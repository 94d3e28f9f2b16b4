//! Configuration System
//!
//! Layered configuration for factory-built emitters and the `ctxlog` binary.
//! Sources are applied lowest to highest: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/ctxlog/config.toml`), the project file
//! (`<root>/ctxlog.toml`), then `CTXLOG_*` environment variables.

use crate::context::check_datefmt;
use crate::diagnostics::DiagnosticsConfig;
use crate::error::LogError;
use crate::factory::Env;
use crate::render::TreeOptions;
use crate::sink::StreamSink;
use crate::types::Severity;
use crate::value::{ContextMap, ContextValue};
use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

mod merge {
    pub mod merge_policy;
}

mod sources {
    pub mod environment;
    pub mod global_file;
    pub mod project_file;
}

pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;
pub use sources::project_file::{project_config_path, PROJECT_FILE_NAME};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Formatter selector: pro (compact JSON) or dev (tree)
    #[serde(default = "default_env")]
    pub env: String,

    /// Severity threshold: debug, info, warning, error, critical
    #[serde(default = "default_level")]
    pub level: String,

    /// Colorize tree output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Show the emitter name in tree headers
    #[serde(default = "default_true")]
    pub show_logger_name: bool,

    /// Indent of the tree context block
    #[serde(default = "default_context_indent")]
    pub context_indent: usize,

    /// chrono format string for the time field
    #[serde(default)]
    pub datefmt: Option<String>,

    #[serde(default = "default_success_msg")]
    pub success_msg: String,

    #[serde(default = "default_failure_msg")]
    pub failure_msg: String,

    #[serde(default)]
    pub suppress_errors: bool,

    /// stdout or stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Formatter params registered on the factory formatter
    #[serde(default)]
    pub params: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

fn default_env() -> String {
    "pro".to_string()
}

fn default_level() -> String {
    "debug".to_string()
}

fn default_true() -> bool {
    true
}

fn default_context_indent() -> usize {
    4
}

fn default_success_msg() -> String {
    "success".to_string()
}

fn default_failure_msg() -> String {
    "failed".to_string()
}

fn default_output() -> String {
    "stdout".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env: default_env(),
            level: default_level(),
            color: default_true(),
            show_logger_name: default_true(),
            context_indent: default_context_indent(),
            datefmt: None,
            success_msg: default_success_msg(),
            failure_msg: default_failure_msg(),
            suppress_errors: false,
            output: default_output(),
            params: BTreeMap::new(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Env(String),
    Level(String),
    Output(String),
    Datefmt(String),
    Diagnostics(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Env(value) => {
                write!(f, "env: '{}' is not one of 'pro', 'dev'", value)
            }
            ValidationError::Level(value) => write!(f, "level: unknown severity '{}'", value),
            ValidationError::Output(value) => {
                write!(f, "output: '{}' is not one of 'stdout', 'stderr'", value)
            }
            ValidationError::Datefmt(value) => {
                write!(f, "datefmt: '{}' is not a valid chrono format", value)
            }
            ValidationError::Diagnostics(msg) => write!(f, "diagnostics: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl LoggingConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.env.parse::<Env>().is_err() {
            errors.push(ValidationError::Env(self.env.clone()));
        }
        if self.level.parse::<Severity>().is_err() {
            errors.push(ValidationError::Level(self.level.clone()));
        }
        if StreamSink::parse(&self.output).is_none() {
            errors.push(ValidationError::Output(self.output.clone()));
        }
        if let Some(datefmt) = &self.datefmt {
            if check_datefmt(datefmt).is_err() {
                errors.push(ValidationError::Datefmt(datefmt.clone()));
            }
        }
        if let Err(e) = self.diagnostics.validate() {
            errors.push(ValidationError::Diagnostics(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and collapse all errors into one `Configuration` error.
    pub fn validated(self) -> Result<Self, LogError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            LogError::Configuration(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    pub fn env(&self) -> Result<Env, LogError> {
        self.env.parse()
    }

    pub fn severity(&self) -> Result<Severity, LogError> {
        self.level.parse()
    }

    pub fn output_stream(&self) -> Result<StreamSink, LogError> {
        StreamSink::parse(&self.output).ok_or_else(|| {
            LogError::Configuration(ValidationError::Output(self.output.clone()).to_string())
        })
    }

    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            color: self.color,
            show_source_name: self.show_logger_name,
            indent_width: self.context_indent,
        }
    }

    /// Formatter params as context values, in key order.
    pub fn formatter_params(&self) -> ContextMap {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), ContextValue::from(value.clone())))
            .collect()
    }
}

/// Loads `LoggingConfig` from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, `<project_root>/ctxlog.toml`, environment.
    pub fn load(project_root: &Path) -> Result<LoggingConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::project_file::add_to_builder(builder, project_root)?;
        let builder = sources::environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Defaults, the given file (which must exist), environment.
    pub fn load_from_file(path: &Path) -> Result<LoggingConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));
        let builder = sources::environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }
}
