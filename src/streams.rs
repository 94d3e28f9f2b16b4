//! Process-wide abstract output streams.
//!
//! Application code writes through `out` and `err` instead of the raw
//! standard streams so a scope can redirect them for the duration of a block.
//! A redirect swaps in the supplied writers (or a discard sink) and the guard
//! restores the previous writers verbatim when dropped.
//!
//! Known limitation: the streams are global and guarded only by enter/exit
//! pairing. Two scopes that redirect concurrently race, and whichever guard
//! drops last decides what is restored.

use crate::sink::{DiscardSink, SinkWriter, StreamSink};
use parking_lot::RwLock;
use std::io;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Which abstract stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

struct Streams {
    out: RwLock<Arc<dyn SinkWriter>>,
    err: RwLock<Arc<dyn SinkWriter>>,
}

impl Streams {
    fn slot(&self, stream: Stream) -> &RwLock<Arc<dyn SinkWriter>> {
        match stream {
            Stream::Out => &self.out,
            Stream::Err => &self.err,
        }
    }
}

fn streams() -> &'static Streams {
    static STREAMS: OnceLock<Streams> = OnceLock::new();
    STREAMS.get_or_init(|| Streams {
        out: RwLock::new(Arc::new(StreamSink::Stdout)),
        err: RwLock::new(Arc::new(StreamSink::Stderr)),
    })
}

/// The writer currently installed for `stream`.
pub fn current(stream: Stream) -> Arc<dyn SinkWriter> {
    streams().slot(stream).read().clone()
}

/// Write one line to the current `out` stream.
pub fn out(text: &str) -> io::Result<()> {
    current(Stream::Out).write_line(text)
}

/// Write one line to the current `err` stream.
pub fn err(text: &str) -> io::Result<()> {
    current(Stream::Err).write_line(text)
}

/// Targets for a redirect; a missing target discards.
#[derive(Clone, Default)]
pub struct Redirect {
    out: Option<Arc<dyn SinkWriter>>,
    err: Option<Arc<dyn SinkWriter>>,
}

impl Redirect {
    /// Discard both streams.
    pub fn discard() -> Self {
        Self::default()
    }

    pub fn out_to(mut self, writer: impl SinkWriter + 'static) -> Self {
        self.out = Some(Arc::new(writer));
        self
    }

    pub fn err_to(mut self, writer: impl SinkWriter + 'static) -> Self {
        self.err = Some(Arc::new(writer));
        self
    }

    pub(crate) fn install(self) -> RedirectGuard {
        let discard: Arc<dyn SinkWriter> = Arc::new(DiscardSink);
        let out = self.out.unwrap_or_else(|| discard.clone());
        let err = self.err.unwrap_or(discard);
        let previous_out = std::mem::replace(&mut *streams().out.write(), out);
        let previous_err = std::mem::replace(&mut *streams().err.write(), err);
        debug!("Output streams redirected");
        RedirectGuard {
            previous_out: Some(previous_out),
            previous_err: Some(previous_err),
        }
    }
}

impl std::fmt::Debug for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redirect")
            .field("out", &self.out.is_some())
            .field("err", &self.err.is_some())
            .finish()
    }
}

/// Restores the redirected streams on drop.
pub(crate) struct RedirectGuard {
    previous_out: Option<Arc<dyn SinkWriter>>,
    previous_err: Option<Arc<dyn SinkWriter>>,
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous_out.take() {
            *streams().out.write() = previous;
        }
        if let Some(previous) = self.previous_err.take() {
            *streams().err.write() = previous;
        }
        debug!("Output streams restored");
    }
}
