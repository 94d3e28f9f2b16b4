//! Compact renderer: one JSON object per line.
//!
//! `level`, `time` and `message` always come first, followed by the merged
//! context in merge order. Objects are encoded through their structured form
//! when they have one and their text otherwise, at any depth, so encoding
//! never fails.

use crate::context::record::{check_datefmt, MergedRecord};
use crate::error::LogError;
use crate::render::{context_with_params, ContextParams, Formatter};
use crate::value::{ContextMap, ContextValue};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Single-line JSON encoder.
#[derive(Debug, Clone, Default)]
pub struct CompactEncoder {
    params: ContextMap,
    datefmt: Option<String>,
}

impl CompactEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default params rendered beneath every record's context.
    pub fn with_params(mut self, params: ContextMap) -> Self {
        self.params = params;
        self
    }

    /// chrono format string for the `time` key. Invalid formats are rejected.
    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Result<Self, LogError> {
        let datefmt = datefmt.into();
        check_datefmt(&datefmt)?;
        self.datefmt = Some(datefmt);
        Ok(self)
    }
}

impl ContextParams for CompactEncoder {
    fn accept_context_param(&mut self, name: &str, default: ContextValue) {
        self.params.insert(name, default);
    }

    fn params(&self) -> &ContextMap {
        &self.params
    }
}

impl Formatter for CompactEncoder {
    fn render(&self, record: &MergedRecord) -> String {
        let context = context_with_params(&self.params, record);
        let line = CompactLine {
            level: record.severity.as_str(),
            time: record.formatted_time(self.datefmt.as_deref()),
            message: &record.message,
            context: &context,
        };
        match serde_json::to_string(&line) {
            Ok(text) => text,
            // Unreachable with the serializers below; keep the line well-formed anyway.
            Err(err) => serde_json::json!({
                "level": record.severity.as_str(),
                "time": line.time,
                "message": record.message,
                "encode_error": err.to_string(),
            })
            .to_string(),
        }
    }

    fn context_params(&mut self) -> Option<&mut dyn ContextParams> {
        Some(self)
    }
}

struct CompactLine<'a> {
    level: &'static str,
    time: String,
    message: &'a str,
    context: &'a ContextMap,
}

impl Serialize for CompactLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.context.len()))?;
        map.serialize_entry("level", self.level)?;
        map.serialize_entry("time", &self.time)?;
        map.serialize_entry("message", self.message)?;
        for (key, value) in self.context {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ContextMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ContextValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContextValue::Null => serializer.serialize_unit(),
            ContextValue::Bool(b) => serializer.serialize_bool(*b),
            ContextValue::Int(i) => serializer.serialize_i64(*i),
            ContextValue::UInt(u) => serializer.serialize_u64(*u),
            ContextValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            // JSON has no NaN or infinity literals
            ContextValue::Float(f) => serializer.serialize_str(&format!("{:?}", f)),
            ContextValue::Str(s) => serializer.serialize_str(s),
            ContextValue::Mapping(map) => map.serialize(serializer),
            ContextValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ContextValue::Object(object) => match object.to_structured() {
                Some(structured) => structured.serialize(serializer),
                None => serializer.collect_str(object),
            },
        }
    }
}
