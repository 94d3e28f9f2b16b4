//! Merge rules: precedence order, top-level overwrite, reserved-key relocation.
//!
//! Frames are applied in the order given. Callers pass them in precedence
//! order: emitter persistent context, adapter frames in binding order,
//! call-site context, then exception metadata. A later frame overwrites an
//! earlier key at the top level only; nested values are replaced wholesale.
//! An overwritten key keeps the position of its first occurrence.

use crate::context::frame::ContextFrame;
use crate::context::record::MergedRecord;
use crate::types::Severity;
use crate::value::ContextMap;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Top-level keys owned by the record itself.
pub const RESERVED_KEYS: [&str; 3] = ["level", "time", "message"];

/// Namespace used for relocated keys when the emitter has no name.
const ANONYMOUS_NAMESPACE: &str = "context";

/// Values for the reserved top-level keys of a record.
#[derive(Debug, Clone)]
pub struct Reserved {
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Reserved {
    pub fn now(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            timestamp: Utc::now(),
            message: message.into(),
        }
    }
}

/// Merge frames into a single ordered context with stable-key, latest-value semantics.
///
/// Empty frames contribute nothing. No reserved-key handling happens here.
pub fn merge_context<'a, I>(frames: I) -> ContextMap
where
    I: IntoIterator<Item = &'a ContextFrame>,
{
    let mut merged = ContextMap::new();
    for frame in frames {
        merged.extend_from(frame.entries());
    }
    merged
}

/// Merge frames and attach the reserved top-level values.
///
/// Context keys that collide with a reserved key never shadow it: they are
/// renamed to `<source>.<key>` in place.
pub fn merge(source: &str, frames: &[ContextFrame], reserved: Reserved) -> MergedRecord {
    let context = relocate_reserved(source, merge_context(frames));
    MergedRecord {
        severity: reserved.severity,
        timestamp: reserved.timestamp,
        message: reserved.message,
        source: source.to_string(),
        context,
    }
}

/// Rename reserved keys to `<source>.<key>`, keeping every key's position.
///
/// When that name is already taken, `.1`, `.2`, ... is appended until it is
/// free, so no value is dropped.
pub(crate) fn relocate_reserved(source: &str, context: ContextMap) -> ContextMap {
    if !context.keys().any(is_reserved) {
        return context;
    }
    let namespace = if source.is_empty() {
        ANONYMOUS_NAMESPACE
    } else {
        source
    };
    let mut taken: HashSet<String> = context.keys().map(str::to_string).collect();
    context
        .into_iter()
        .map(|(key, value)| {
            if !is_reserved(&key) {
                return (key, value);
            }
            let base = format!("{}.{}", namespace, key);
            let mut name = base.clone();
            let mut suffix = 0;
            while taken.contains(&name) {
                suffix += 1;
                name = format!("{}.{}", base, suffix);
            }
            taken.insert(name.clone());
            (name, value)
        })
        .collect()
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}
