//! Renderers: the formatter capability interface and its two implementations.
//!
//! Every formatter turns a `MergedRecord` into one finished piece of text.
//! Formatters that also accept dynamic context params expose them through
//! `Formatter::context_params`; adapters and call instrumentation require at
//! least one such formatter on the emitter they wrap.

pub mod compact;
mod style;
pub mod tree;

pub use compact::CompactEncoder;
pub use tree::{TreeOptions, TreeRenderer};

use crate::context::frame::{ContextFrame, FrameSource};
use crate::context::merge::{merge_context, relocate_reserved};
use crate::context::record::MergedRecord;
use crate::value::{ContextMap, ContextValue};
use std::borrow::Cow;

/// Capability: the formatter keeps its own named context params with defaults.
pub trait ContextParams {
    /// Register `name` with a default value rendered when no record overrides it.
    fn accept_context_param(&mut self, name: &str, default: ContextValue);

    fn params(&self) -> &ContextMap;
}

/// Turns a merged record into text.
pub trait Formatter: Send + Sync {
    fn render(&self, record: &MergedRecord) -> String;

    /// The dynamic-context capability, when the formatter supports it.
    fn context_params(&mut self) -> Option<&mut dyn ContextParams> {
        None
    }
}

/// Record context with formatter params merged beneath it.
pub(crate) fn context_with_params<'a>(
    params: &ContextMap,
    record: &'a MergedRecord,
) -> Cow<'a, ContextMap> {
    if params.is_empty() {
        return Cow::Borrowed(&record.context);
    }
    let frames = [
        ContextFrame::new(FrameSource::Formatter, params.clone()),
        ContextFrame::new(FrameSource::CallSite, record.context.clone()),
    ];
    Cow::Owned(relocate_reserved(&record.source, merge_context(&frames)))
}
