//! Context injection adapter.
//!
//! `ContextLogger` wraps any emitter (a base `Logger` or another adapter) and
//! adds one fixed `{key: value}` frame to every emission it forwards. Stacked
//! adapters contribute their frames in binding order, so the adapter bound
//! directly over the base emitter comes first and call-site fields still
//! override all of them.

use crate::context::ContextFrame;
use crate::error::LogError;
use crate::logger::{Emission, Emit, Logger};
use crate::value::ContextValue;

#[derive(Debug, Clone)]
pub struct ContextLogger<E: Emit> {
    inner: E,
    key: String,
    value: ContextValue,
}

impl<E: Emit> ContextLogger<E> {
    /// Wrap `inner`. The base emitter must carry a formatter that accepts
    /// context params.
    pub fn bind(
        inner: E,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Result<Self, LogError> {
        inner.base().require_context_params()?;
        Ok(Self {
            inner,
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &ContextValue {
        &self.value
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: Emit> Emit for ContextLogger<E> {
    fn dispatch(&self, emission: Emission) {
        let frame = ContextFrame::adapter(self.key.clone(), self.value.clone());
        self.inner.dispatch(emission.bind_inner(frame));
    }

    fn base(&self) -> &Logger {
        self.inner.base()
    }
}
