//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::config::{ConfigLoader, LoggingConfig};
use crate::context::{MergedRecord, RESERVED_KEYS};
use crate::error::LogError;
use crate::factory;
use crate::logger::Emit;
use crate::render::{Formatter, TreeRenderer};
use crate::sink::SinkWriter;
use crate::streams::{self, Stream};
use crate::types::Severity;
use crate::value::{ContextMap, ContextValue};
use chrono::{DateTime, Utc};
use std::io::BufRead;
use std::path::PathBuf;
use tracing::{debug, info};

/// Runtime context for CLI execution: the effective configuration.
/// Built from the project root and optional config path using ConfigLoader only.
pub struct RunContext {
    config: LoggingConfig,
}

impl RunContext {
    /// Load configuration, then apply CLI overrides (highest priority).
    pub fn new(
        project_root: PathBuf,
        config_path: Option<PathBuf>,
        env: Option<String>,
        no_color: bool,
    ) -> Result<Self, LogError> {
        let mut config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&project_root)?,
        };
        if let Some(env) = env {
            config.env = env;
        }
        if no_color {
            config.color = false;
        }
        Ok(Self::from_config(config.validated()?))
    }

    pub fn from_config(config: LoggingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Execute a command. Returns text for the caller to print, if any.
    pub fn execute(&self, command: &Commands) -> Result<Option<String>, LogError> {
        match command {
            Commands::Emit {
                level,
                message,
                name,
                fields,
            } => {
                self.emit(name, level, message, fields)?;
                Ok(None)
            }
            Commands::Pretty { name } => {
                let stdin = std::io::stdin();
                let out = streams::current(Stream::Out);
                let rendered = self.pretty(stdin.lock(), name.as_deref(), out.as_ref())?;
                info!(lines = rendered, "Pretty rendering finished");
                Ok(None)
            }
            Commands::Config { format } => self.show_config(format).map(Some),
        }
    }

    /// Emit one record through a factory emitter built from the configuration.
    pub fn emit(
        &self,
        name: &str,
        level: &str,
        message: &str,
        fields: &[String],
    ) -> Result<(), LogError> {
        let severity: Severity = level.parse()?;
        let fields = fields
            .iter()
            .map(|field| parse_field(field))
            .collect::<Result<ContextMap, LogError>>()?;
        let logger = factory::from_config(name, &self.config)?;
        logger.log(severity, message, fields);
        Ok(())
    }

    /// Re-render compact lines from `input` as trees into `out`. Lines that
    /// are not compact records pass through unchanged; bytes that are not
    /// UTF-8 become U+FFFD. Returns how many lines were re-rendered.
    pub fn pretty<R: BufRead>(
        &self,
        mut input: R,
        name: Option<&str>,
        out: &dyn SinkWriter,
    ) -> Result<usize, LogError> {
        let mut renderer = TreeRenderer::new(self.config.tree_options());
        if let Some(datefmt) = &self.config.datefmt {
            renderer = renderer.with_datefmt(datefmt.clone())?;
        }
        let source = name.unwrap_or_default();

        let mut buf = Vec::new();
        let mut rendered = 0;
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf);
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            let line = String::from_utf8_lossy(bytes);
            match record_from_line(&line, source) {
                Some(record) => {
                    out.write_line(&renderer.render(&record))?;
                    rendered += 1;
                }
                None => {
                    debug!("Passing through non-record line");
                    out.write_line(&line)?;
                }
            }
        }
        Ok(rendered)
    }

    fn show_config(&self, format: &str) -> Result<String, LogError> {
        match format {
            "toml" => toml::to_string_pretty(&self.config)
                .map_err(|e| LogError::Configuration(format!("Failed to encode config: {}", e))),
            "json" => serde_json::to_string_pretty(&self.config)
                .map_err(|e| LogError::Configuration(format!("Failed to encode config: {}", e))),
            other => Err(LogError::Configuration(format!(
                "Invalid format: {} (must be 'toml' or 'json')",
                other
            ))),
        }
    }
}

/// Parse `key=value`. The value is JSON when it parses as JSON, else a string.
pub fn parse_field(field: &str) -> Result<(String, ContextValue), LogError> {
    let (key, raw) = field.split_once('=').ok_or_else(|| {
        LogError::Configuration(format!("Invalid field '{}' (expected key=value)", field))
    })?;
    if key.is_empty() {
        return Err(LogError::Configuration(format!(
            "Invalid field '{}' (empty key)",
            field
        )));
    }
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => ContextValue::from(json),
        Err(_) => ContextValue::from(raw),
    };
    Ok((key.to_string(), value))
}

/// Rebuild a record from one compact line.
fn record_from_line(line: &str, source: &str) -> Option<MergedRecord> {
    let serde_json::Value::Object(object) = serde_json::from_str::<serde_json::Value>(line).ok()?
    else {
        return None;
    };
    let severity = object.get("level")?.as_str()?.parse::<Severity>().ok()?;
    let timestamp = DateTime::parse_from_rfc3339(object.get("time")?.as_str()?)
        .ok()?
        .with_timezone(&Utc);
    let message = object.get("message")?.as_str()?.to_string();
    let context = object
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key, ContextValue::from(value)))
        .collect();
    Some(MergedRecord {
        severity,
        timestamp,
        message,
        source: source.to_string(),
        context,
    })
}
