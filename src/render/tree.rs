//! Tree renderer: human-readable, optionally colorized, multi-level output.
//!
//! ```text
//! 2024-05-01T12:30:00.000Z [INFO] checkout: Payment completed
//!     └─ amount=42 env="prod"
//!        cart:
//!         items:
//!           [0]="book"
//! ```
//!
//! Scalar context goes on one bullet line sorted by key; each mapping or
//! sequence entry gets an opener line and a recursive dump, also sorted by
//! key. Output is for terminals only and is not meant to be parsed back.

use crate::context::record::{check_datefmt, MergedRecord};
use crate::error::LogError;
use crate::render::style::Painter;
use crate::render::{context_with_params, ContextParams, Formatter};
use crate::value::{ContextMap, ContextValue};
use serde::{Deserialize, Serialize};

const BULLET: &str = "└─";
const CONTINUATION: &str = "│ ";
const NEST_STEP: &str = "  ";
/// Nesting level of the first dumped line under a complex entry's opener.
const DUMP_START_LEVEL: usize = 2;

/// Rendering options; each is independent of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOptions {
    pub color: bool,
    pub show_source_name: bool,
    pub indent_width: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            color: true,
            show_source_name: true,
            indent_width: 4,
        }
    }
}

/// Pretty console renderer.
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    options: TreeOptions,
    params: ContextMap,
    datefmt: Option<String>,
}

impl TreeRenderer {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            options,
            params: ContextMap::new(),
            datefmt: None,
        }
    }

    pub fn with_params(mut self, params: ContextMap) -> Self {
        self.params = params;
        self
    }

    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Result<Self, LogError> {
        let datefmt = datefmt.into();
        check_datefmt(&datefmt)?;
        self.datefmt = Some(datefmt);
        Ok(self)
    }

    pub fn options(&self) -> TreeOptions {
        self.options
    }

    fn painter(&self) -> Painter {
        Painter::new(self.options.color)
    }

    /// Header plus message. Continuation lines of a multi-line message are
    /// aligned one column past the header's visible width.
    fn message_block(&self, record: &MergedRecord) -> String {
        let painter = self.painter();
        let time = record.formatted_time(self.datefmt.as_deref());
        let level = record.severity.as_str();

        let mut header = format!("{} [{}]", painter.time(&time), painter.level(record.severity));
        let mut width = time.chars().count() + level.chars().count() + 3;
        if self.options.show_source_name && !record.source.is_empty() {
            header.push(' ');
            header.push_str(&painter.source(&record.source));
            header.push(':');
            width += record.source.chars().count() + 2;
        }

        let mut lines = record.message.split('\n');
        let first = lines.next().unwrap_or_default();
        let mut out = format!("{} {}", header, first);
        let prefix = format!("{}{}", " ".repeat(width + 1), painter.marker(CONTINUATION));
        for line in lines {
            out.push('\n');
            out.push_str(&prefix);
            out.push_str(line);
        }
        out
    }

    fn context_block(&self, context: &ContextMap) -> Vec<String> {
        let painter = self.painter();
        let base_indent = " ".repeat(self.options.indent_width);

        let mut scalars: Vec<(&str, String)> = Vec::new();
        let mut complex: Vec<(&str, ContextValue)> = Vec::new();
        for (key, value) in context {
            let value = value.resolved();
            match scalar_literal(&value) {
                Some(literal) => scalars.push((key.as_str(), literal)),
                None => complex.push((key.as_str(), value.into_owned())),
            }
        }
        scalars.sort_by(|a, b| a.0.cmp(b.0));
        complex.sort_by(|a, b| a.0.cmp(b.0));

        let mut lines = Vec::new();
        let bullet = painter.marker(BULLET);
        if scalars.is_empty() {
            lines.push(format!("{}{}", base_indent, bullet));
        } else {
            let parts: Vec<String> = scalars
                .iter()
                .map(|(key, literal)| format!("{}={}", painter.key(key), literal))
                .collect();
            lines.push(format!("{}{} {}", base_indent, bullet, parts.join(" ")));
        }

        for (key, value) in &complex {
            lines.push(format!("{}   {}:", base_indent, painter.key(key)));
            dump(&painter, value, &base_indent, DUMP_START_LEVEL, &mut lines);
        }
        lines
    }
}

impl ContextParams for TreeRenderer {
    fn accept_context_param(&mut self, name: &str, default: ContextValue) {
        self.params.insert(name, default);
    }

    fn params(&self) -> &ContextMap {
        &self.params
    }
}

impl Formatter for TreeRenderer {
    fn render(&self, record: &MergedRecord) -> String {
        let mut out = self.message_block(record);
        let context = context_with_params(&self.params, record);
        if !context.is_empty() {
            for line in self.context_block(&context) {
                out.push('\n');
                out.push_str(&line);
            }
        }
        out
    }

    fn context_params(&mut self) -> Option<&mut dyn ContextParams> {
        Some(self)
    }
}

/// Literal for scalar values and opaque objects; `None` for mappings and sequences.
fn scalar_literal(value: &ContextValue) -> Option<String> {
    match value {
        ContextValue::Null => Some("null".to_string()),
        ContextValue::Bool(b) => Some(b.to_string()),
        ContextValue::Int(i) => Some(i.to_string()),
        ContextValue::UInt(u) => Some(u.to_string()),
        ContextValue::Float(f) => Some(format!("{:?}", f)),
        ContextValue::Str(s) => Some(format!("{:?}", s)),
        ContextValue::Object(object) => Some(object.to_string()),
        ContextValue::Mapping(_) | ContextValue::Sequence(_) => None,
    }
}

fn dump(
    painter: &Painter,
    value: &ContextValue,
    base_indent: &str,
    level: usize,
    lines: &mut Vec<String>,
) {
    let indent = format!("{}{}", base_indent, NEST_STEP.repeat(level));
    match value {
        ContextValue::Mapping(map) => {
            for (key, member) in map {
                dump_member(painter, key, member, &indent, base_indent, level, lines);
            }
        }
        ContextValue::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                let label = format!("[{}]", index);
                dump_member(painter, &label, item, &indent, base_indent, level, lines);
            }
        }
        scalar => {
            if let Some(literal) = scalar_literal(scalar) {
                lines.push(format!("{}{}", indent, literal));
            }
        }
    }
}

fn dump_member(
    painter: &Painter,
    label: &str,
    member: &ContextValue,
    indent: &str,
    base_indent: &str,
    level: usize,
    lines: &mut Vec<String>,
) {
    let member = member.resolved();
    match scalar_literal(&member) {
        Some(literal) => lines.push(format!("{}{}={}", indent, painter.key(label), literal)),
        None => {
            lines.push(format!("{}{}:", indent, painter.key(label)));
            dump(painter, &member, base_indent, level + 1, lines);
        }
    }
}
