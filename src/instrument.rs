//! Call instrumentation: log invocations and failures of wrapped functions.

use crate::error::LogError;
use crate::logger::Emit;
use crate::types::Severity;
use crate::value::{ContextMap, ContextValue};
use std::fmt::Display;

/// Logs every call at INFO as `func <name> called` with its arguments.
#[derive(Debug, Clone)]
pub struct CallLogger<E: Emit> {
    emitter: E,
}

impl<E: Emit> CallLogger<E> {
    pub fn new(emitter: E) -> Result<Self, LogError> {
        emitter.base().require_context_params()?;
        Ok(Self { emitter })
    }

    pub fn call<T>(&self, name: &str, args: impl Into<ContextMap>, f: impl FnOnce() -> T) -> T {
        let args = ContextValue::Mapping(args.into());
        self.emitter.log(
            Severity::Info,
            format!("func {} called", name),
            ContextMap::from([("args", args)]),
        );
        f()
    }
}

/// Logs failed calls at ERROR, then swallows or returns the error.
#[derive(Debug, Clone)]
pub struct ErrorLogger<E: Emit> {
    emitter: E,
    suppress: bool,
}

impl<E: Emit> ErrorLogger<E> {
    pub fn new(emitter: E, suppress: bool) -> Result<Self, LogError> {
        emitter.base().require_context_params()?;
        Ok(Self { emitter, suppress })
    }

    /// `Ok(None)` for a swallowed failure; otherwise the original error.
    pub fn call<T, X: Display>(
        &self,
        name: &str,
        args: impl Into<ContextMap>,
        f: impl FnOnce() -> Result<T, X>,
    ) -> Result<Option<T>, X> {
        match f() {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                let args: ContextMap = args.into();
                let fields = ContextMap::new()
                    .with("function_name", name)
                    .with("args", args);
                self.emitter.log(Severity::Error, err.to_string(), fields);
                if self.suppress {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}
