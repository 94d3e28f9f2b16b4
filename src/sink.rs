//! Sinks: destinations for finished lines of text.
//!
//! A `Sink` pairs one writer with the formatter it exclusively owns. Write
//! failures are reported through `tracing` and never reach the emitting caller.

use crate::context::record::MergedRecord;
use crate::render::Formatter;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::error;

/// Accepts one finished line of text.
pub trait SinkWriter: Send + Sync {
    fn write_line(&self, text: &str) -> io::Result<()>;
}

impl<W: SinkWriter + ?Sized> SinkWriter for Arc<W> {
    fn write_line(&self, text: &str) -> io::Result<()> {
        (**self).write_line(text)
    }
}

/// Standard output or standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSink {
    Stdout,
    Stderr,
}

impl StreamSink {
    /// `stdout` or `stderr`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "stdout" => Some(StreamSink::Stdout),
            "stderr" => Some(StreamSink::Stderr),
            _ => None,
        }
    }
}

impl SinkWriter for StreamSink {
    fn write_line(&self, text: &str) -> io::Result<()> {
        match self {
            StreamSink::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}", text)?;
                out.flush()
            }
            StreamSink::Stderr => {
                let mut err = io::stderr().lock();
                writeln!(err, "{}", text)
            }
        }
    }
}

/// Collects lines in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl SinkWriter for MemorySink {
    fn write_line(&self, text: &str) -> io::Result<()> {
        self.lines.lock().push(text.to_string());
        Ok(())
    }
}

/// Drops everything written to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl SinkWriter for DiscardSink {
    fn write_line(&self, _text: &str) -> io::Result<()> {
        Ok(())
    }
}

/// A writer and the formatter it owns.
pub struct Sink {
    writer: Box<dyn SinkWriter>,
    formatter: Box<dyn Formatter>,
}

impl Sink {
    pub fn new(writer: impl SinkWriter + 'static, formatter: impl Formatter + 'static) -> Self {
        Self::boxed(Box::new(writer), Box::new(formatter))
    }

    pub fn boxed(writer: Box<dyn SinkWriter>, formatter: Box<dyn Formatter>) -> Self {
        Self { writer, formatter }
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn formatter_mut(&mut self) -> &mut dyn Formatter {
        self.formatter.as_mut()
    }

    /// Render and write one record.
    pub(crate) fn emit(&self, record: &MergedRecord) {
        let text = self.formatter.render(record);
        if let Err(e) = self.writer.write_line(&text) {
            error!(source = %record.source, error = %e, "Failed to write log line to sink");
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}
