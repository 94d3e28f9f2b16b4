//! The merged record handed to every formatter attached to an emitter.

use crate::error::LogError;
use crate::types::Severity;
use crate::value::ContextMap;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Name of the emitter that produced the record
    pub source: String,
    /// Merged context, reserved keys already relocated
    pub context: ContextMap,
}

impl MergedRecord {
    /// Format the timestamp with a chrono format string, or RFC 3339 with
    /// milliseconds when none is given. A format chrono cannot apply also
    /// yields RFC 3339.
    pub fn formatted_time(&self, datefmt: Option<&str>) -> String {
        if let Some(fmt) = datefmt {
            let mut out = String::new();
            if write!(out, "{}", self.timestamp.format(fmt)).is_ok() {
                return out;
            }
        }
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Reject chrono format strings containing unknown or incomplete specifiers.
pub fn check_datefmt(fmt: &str) -> Result<(), LogError> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(LogError::Configuration(format!(
            "datefmt '{}' is not a valid chrono format",
            fmt
        )));
    }
    Ok(())
}
