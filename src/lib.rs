//! ctxlog: Structured Logging Context Layer
//!
//! Emitters merge persistent, adapter, call-site and exception context into
//! one record per emission and render it either as a compact JSON line or as
//! a human-readable tree. Scopes bracket units of work with one success or
//! failure record; adapters inject fixed context into every emission.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod factory;
pub mod instrument;
pub mod logger;
pub mod registry;
pub mod render;
pub mod scope;
pub mod sink;
pub mod streams;
pub mod types;
pub mod value;

pub use adapter::ContextLogger;
pub use config::{ConfigLoader, LoggingConfig};
pub use context::{ExceptionInfo, MergedRecord};
pub use error::LogError;
pub use factory::{get_logger, Env, LoggerOptions};
pub use instrument::{CallLogger, ErrorLogger};
pub use logger::{Emission, Emit, Logger, LoggerBuilder, ScopeDefaults};
pub use registry::EmitterRegistry;
pub use render::{CompactEncoder, ContextParams, Formatter, TreeOptions, TreeRenderer};
pub use scope::{Scope, ScopeExit};
pub use sink::{MemorySink, Sink, SinkWriter, StreamSink};
pub use streams::Redirect;
pub use types::Severity;
pub use value::{ContextMap, ContextObject, ContextValue};
