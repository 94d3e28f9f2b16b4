//! Base emitter
//!
//! A `Logger` owns a name, a severity threshold, persistent context and its
//! sinks. Every emission snapshots the persistent context, merges it with the
//! adapter, call-site and exception frames, and hands the one resulting
//! record to every sink. Handles are cheap clones of one shared emitter.

use crate::context::{merge, ContextFrame, ExceptionInfo, Reserved};
use crate::error::LogError;
use crate::registry::{self, EmitterRegistry};
use crate::sink::Sink;
use crate::types::Severity;
use crate::value::{ContextMap, ContextValue};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

/// Messages and policy used when a scope exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDefaults {
    pub success_message: String,
    pub failure_message: String,
    /// Swallow scope failures (logged at WARNING) instead of propagating them (ERROR)
    pub suppress_errors: bool,
}

impl Default for ScopeDefaults {
    fn default() -> Self {
        Self {
            success_message: "success".to_string(),
            failure_message: "failed".to_string(),
            suppress_errors: false,
        }
    }
}

/// One emission travelling down an adapter chain to its base emitter.
#[derive(Debug, Clone)]
pub struct Emission {
    pub severity: Severity,
    pub message: String,
    /// Adapter frames, the adapter closest to the base emitter first
    pub bound: Vec<ContextFrame>,
    pub fields: ContextMap,
    pub exception: Option<ExceptionInfo>,
}

impl Emission {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            bound: Vec::new(),
            fields: ContextMap::new(),
            exception: None,
        }
    }

    pub fn with_fields(mut self, fields: ContextMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Add a frame from an adapter one layer closer to the base emitter than
    /// any already bound. Adapters add their frames outermost first.
    pub(crate) fn bind_inner(mut self, frame: ContextFrame) -> Self {
        self.bound.insert(0, frame);
        self
    }
}

/// Emission operations shared by the base emitter and every adapter over it.
pub trait Emit {
    fn dispatch(&self, emission: Emission);

    /// The base emitter at the bottom of the chain.
    fn base(&self) -> &Logger;

    fn log(&self, severity: Severity, message: impl Into<String>, fields: impl Into<ContextMap>) {
        self.dispatch(Emission::new(severity, message).with_fields(fields.into()));
    }

    fn log_exception(
        &self,
        severity: Severity,
        message: impl Into<String>,
        fields: impl Into<ContextMap>,
        exception: ExceptionInfo,
    ) {
        self.dispatch(
            Emission::new(severity, message)
                .with_fields(fields.into())
                .with_exception(exception),
        );
    }

    fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message, ContextMap::new());
    }

    fn debug_with(&self, message: impl Into<String>, fields: impl Into<ContextMap>) {
        self.log(Severity::Debug, message, fields);
    }

    fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message, ContextMap::new());
    }

    fn info_with(&self, message: impl Into<String>, fields: impl Into<ContextMap>) {
        self.log(Severity::Info, message, fields);
    }

    fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message, ContextMap::new());
    }

    fn warning_with(&self, message: impl Into<String>, fields: impl Into<ContextMap>) {
        self.log(Severity::Warning, message, fields);
    }

    fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message, ContextMap::new());
    }

    fn error_with(&self, message: impl Into<String>, fields: impl Into<ContextMap>) {
        self.log(Severity::Error, message, fields);
    }

    fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message, ContextMap::new());
    }

    fn critical_with(&self, message: impl Into<String>, fields: impl Into<ContextMap>) {
        self.log(Severity::Critical, message, fields);
    }
}

pub(crate) struct LoggerInner {
    id: u64,
    name: String,
    level: AtomicU8,
    context: RwLock<ContextMap>,
    /// Read recursively while rendering so objects may log through the same emitter.
    sinks: RwLock<Vec<Sink>>,
    scope_defaults: ScopeDefaults,
    pub(crate) scope_active: AtomicBool,
    registry: Weak<EmitterRegistry>,
}

impl LoggerInner {
    pub(crate) fn set_level(&self, level: Severity) {
        self.level.store(level.as_u8(), Ordering::Relaxed);
    }

    fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::Relaxed))
    }
}

impl Drop for LoggerInner {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.deregister(self.id);
        }
    }
}

/// Base emitter handle.
#[derive(Clone)]
pub struct Logger {
    pub(crate) inner: Arc<LoggerInner>,
}

impl Logger {
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn level(&self) -> Severity {
        self.inner.level()
    }

    pub fn set_level(&self, level: Severity) {
        self.inner.set_level(level);
    }

    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        severity >= self.level()
    }

    /// Add or replace a persistent context entry. Visible from the next emission on.
    pub fn add_context(&self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.inner.context.write().insert(key, value);
    }

    /// Snapshot of the persistent context.
    pub fn context(&self) -> ContextMap {
        self.inner.context.read().clone()
    }

    pub fn add_sink(&self, sink: Sink) {
        self.inner.sinks.write().push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.inner.sinks.read_recursive().len()
    }

    /// Whether any attached formatter accepts dynamic context params.
    pub fn supports_context_params(&self) -> bool {
        self.inner
            .sinks
            .write()
            .iter_mut()
            .any(|sink| sink.formatter_mut().context_params().is_some())
    }

    /// Register a formatter param on every capable formatter. Returns how many accepted it.
    pub fn accept_context_param(&self, name: &str, default: impl Into<ContextValue>) -> usize {
        let default = default.into();
        let mut accepted = 0;
        for sink in self.inner.sinks.write().iter_mut() {
            if let Some(params) = sink.formatter_mut().context_params() {
                params.accept_context_param(name, default.clone());
                accepted += 1;
            }
        }
        accepted
    }

    /// Fail fast unless a formatter accepts dynamic context params.
    pub(crate) fn require_context_params(&self) -> Result<(), LogError> {
        if self.supports_context_params() {
            Ok(())
        } else {
            Err(LogError::Configuration(format!(
                "emitter '{}' has no sink whose formatter accepts context params",
                self.name()
            )))
        }
    }

    pub fn scope_defaults(&self) -> &ScopeDefaults {
        &self.inner.scope_defaults
    }
}

impl Emit for Logger {
    fn dispatch(&self, emission: Emission) {
        if !self.is_enabled_for(emission.severity) {
            return;
        }
        let Emission {
            severity,
            message,
            bound,
            fields,
            exception,
        } = emission;

        let mut frames = Vec::with_capacity(bound.len() + 3);
        frames.push(ContextFrame::emitter(self.name(), self.context()));
        frames.extend(bound);
        frames.push(ContextFrame::call_site(fields));
        if let Some(info) = &exception {
            frames.push(ContextFrame::exception(info));
        }

        let record = merge(self.name(), &frames, Reserved::now(severity, message));
        for sink in self.inner.sinks.read_recursive().iter() {
            sink.emit(&record);
        }
    }

    fn base(&self) -> &Logger {
        self
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.inner.name)
            .field("level", &self.level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

/// Builder for `Logger`.
pub struct LoggerBuilder {
    name: String,
    level: Severity,
    context: ContextMap,
    sinks: Vec<Sink>,
    scope_defaults: ScopeDefaults,
    registry: Option<Arc<EmitterRegistry>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Severity::Debug,
            context: ContextMap::new(),
            sinks: Vec::new(),
            scope_defaults: ScopeDefaults::default(),
            registry: None,
        }
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Persistent context entry.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context.insert(key, value);
        self
    }

    pub fn context_map(mut self, context: ContextMap) -> Self {
        self.context.extend_from(&context);
        self
    }

    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.scope_defaults.success_message = message.into();
        self
    }

    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.scope_defaults.failure_message = message.into();
        self
    }

    pub fn suppress_errors(mut self, suppress: bool) -> Self {
        self.scope_defaults.suppress_errors = suppress;
        self
    }

    pub fn scope_defaults(mut self, defaults: ScopeDefaults) -> Self {
        self.scope_defaults = defaults;
        self
    }

    /// Register with `registry` instead of the process-wide one.
    pub fn registry(mut self, registry: &Arc<EmitterRegistry>) -> Self {
        self.registry = Some(Arc::clone(registry));
        self
    }

    pub fn build(self) -> Logger {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::clone(registry::global()));
        let id = registry.next_id();
        let inner = Arc::new(LoggerInner {
            id,
            name: self.name,
            level: AtomicU8::new(self.level.as_u8()),
            context: RwLock::new(self.context),
            sinks: RwLock::new(self.sinks),
            scope_defaults: self.scope_defaults,
            scope_active: AtomicBool::new(false),
            registry: Arc::downgrade(&registry),
        });
        registry.register(id, &inner);
        Logger { inner }
    }
}
