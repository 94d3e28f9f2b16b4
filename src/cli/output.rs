//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::LogError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &LogError) -> String {
    match e {
        LogError::Configuration(msg) => format!("configuration: {}", msg),
        other => other.to_string(),
    }
}
