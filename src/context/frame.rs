//! Context Frames
//!
//! One source's contribution of key/value context to a single emission.
//! Frames are built fresh per emission and never mutated once captured.

use crate::context::exception::{ExceptionInfo, ERROR_TYPE_KEY, ERROR_VALUE_KEY};
use crate::value::{ContextMap, ContextValue};

/// Where a frame came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    /// Persistent context of the named emitter
    Emitter(String),
    /// Context bound by an injection adapter under the given key
    Adapter(String),
    /// Formatter-level default params
    Formatter,
    /// Transient context passed at the call site
    CallSite,
    /// Exception metadata on failure paths
    Exception,
}

/// Context frame
#[derive(Debug, Clone, PartialEq)]
pub struct ContextFrame {
    source: FrameSource,
    entries: ContextMap,
}

impl ContextFrame {
    pub fn new(source: FrameSource, entries: ContextMap) -> Self {
        Self { source, entries }
    }

    pub fn emitter(name: impl Into<String>, entries: ContextMap) -> Self {
        Self::new(FrameSource::Emitter(name.into()), entries)
    }

    /// Single-entry frame contributed by an injection adapter.
    pub fn adapter(key: impl Into<String>, value: ContextValue) -> Self {
        let key = key.into();
        let mut entries = ContextMap::new();
        entries.insert(key.clone(), value);
        Self::new(FrameSource::Adapter(key), entries)
    }

    pub fn call_site(entries: ContextMap) -> Self {
        Self::new(FrameSource::CallSite, entries)
    }

    /// Exception frame with exactly the `error_type` and `error_value` keys.
    pub fn exception(info: &ExceptionInfo) -> Self {
        let entries = ContextMap::new()
            .with(ERROR_TYPE_KEY, info.kind.as_str())
            .with(ERROR_VALUE_KEY, info.value.as_str());
        Self::new(FrameSource::Exception, entries)
    }

    pub fn source(&self) -> &FrameSource {
        &self.source
    }

    pub fn entries(&self) -> &ContextMap {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
