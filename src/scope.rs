//! Scoped emission: bracket a unit of work with one success or failure record.
//!
//! `Logger::enter` returns a `Scope`. The scope exits exactly once, through
//! `succeed`, `fail`, `run`, or drop. A scope dropped while its thread is
//! panicking records the panic at ERROR and never swallows it. Redirected
//! streams are restored on every exit path.

use crate::context::ExceptionInfo;
use crate::error::LogError;
use crate::logger::{Emission, Emit, Logger};
use crate::streams::{Redirect, RedirectGuard};
use crate::types::Severity;
use crate::value::ContextMap;
use std::sync::atomic::Ordering;
use tracing::debug;

/// What the caller should do with a failure after the scope recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeExit {
    Swallow,
    Propagate,
}

impl ScopeExit {
    pub fn is_swallowed(self) -> bool {
        self == ScopeExit::Swallow
    }
}

impl Logger {
    /// Enter a scope on this emitter. Fails if one is already active.
    pub fn enter(&self) -> Result<Scope, LogError> {
        Scope::begin(self, None)
    }

    /// Enter a scope with `out`/`err` redirected until it exits.
    pub fn enter_redirected(&self, redirect: Redirect) -> Result<Scope, LogError> {
        Scope::begin(self, Some(redirect))
    }
}

/// Active scope handle.
pub struct Scope {
    logger: Logger,
    success_message: String,
    failure_message: String,
    suppress_errors: bool,
    redirect: Option<RedirectGuard>,
    finished: bool,
}

impl Scope {
    fn begin(logger: &Logger, redirect: Option<Redirect>) -> Result<Self, LogError> {
        if logger
            .inner
            .scope_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LogError::ScopeAlreadyActive(logger.name().to_string()));
        }
        let defaults = logger.scope_defaults();
        let scope = Self {
            logger: logger.clone(),
            success_message: defaults.success_message.clone(),
            failure_message: defaults.failure_message.clone(),
            suppress_errors: defaults.suppress_errors,
            redirect: redirect.map(Redirect::install),
            finished: false,
        };
        debug!(emitter = %logger.name(), redirected = scope.redirect.is_some(), "Scope entered");
        Ok(scope)
    }

    /// One-shot message overrides for this scope's exit.
    pub fn with_message(mut self, success: impl Into<String>, failure: Option<&str>) -> Self {
        self.success_message = success.into();
        if let Some(failure) = failure {
            self.failure_message = failure.to_string();
        }
        self
    }

    pub fn suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    /// Clean exit: one INFO record carrying the success message.
    pub fn succeed(mut self) {
        self.exit_success();
    }

    /// Failure exit for `err`. The caller decides from the result whether to
    /// return the original error.
    pub fn fail<E: std::error::Error + 'static>(self, err: &E) -> ScopeExit {
        self.fail_with(ExceptionInfo::from_error(err))
    }

    pub fn fail_with(mut self, exception: ExceptionInfo) -> ScopeExit {
        let severity = if self.suppress_errors {
            Severity::Warning
        } else {
            Severity::Error
        };
        self.exit_failure(severity, exception);
        if self.suppress_errors {
            ScopeExit::Swallow
        } else {
            ScopeExit::Propagate
        }
    }

    /// Run `f` inside the scope. A swallowed error yields `Ok(None)`; a
    /// propagated one is returned unchanged.
    pub fn run<T, E, F>(self, f: F) -> Result<Option<T>, E>
    where
        E: std::error::Error + 'static,
        F: FnOnce(&Scope) -> Result<T, E>,
    {
        match f(&self) {
            Ok(value) => {
                self.succeed();
                Ok(Some(value))
            }
            Err(err) => match self.fail(&err) {
                ScopeExit::Swallow => Ok(None),
                ScopeExit::Propagate => Err(err),
            },
        }
    }

    fn exit_success(&mut self) {
        self.finished = true;
        let message = std::mem::take(&mut self.success_message);
        self.logger.info(message);
    }

    fn exit_failure(&mut self, severity: Severity, exception: ExceptionInfo) {
        self.finished = true;
        let message = std::mem::take(&mut self.failure_message);
        self.logger
            .log_exception(severity, message, ContextMap::new(), exception);
    }
}

impl Emit for Scope {
    fn dispatch(&self, emission: Emission) {
        self.logger.dispatch(emission);
    }

    fn base(&self) -> &Logger {
        &self.logger
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !self.finished {
            if std::thread::panicking() {
                self.exit_failure(Severity::Error, ExceptionInfo::panic(None));
            } else {
                self.exit_success();
            }
        }
        self.redirect.take();
        self.logger
            .inner
            .scope_active
            .store(false, Ordering::Release);
        debug!(emitter = %self.logger.name(), "Scope exited");
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("emitter", &self.logger.name())
            .field("suppress_errors", &self.suppress_errors)
            .field("redirected", &self.redirect.is_some())
            .finish()
    }
}
