//! ANSI styling for the tree renderer.
//!
//! Painting only wraps a segment in style codes terminated by a reset; the
//! text itself is never altered.

use crate::types::Severity;
use owo_colors::{OwoColorize, Style};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Painter {
    enabled: bool,
}

impl Painter {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn time(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_black().dimmed())
    }

    pub(crate) fn level(&self, severity: Severity) -> String {
        let style = match severity {
            Severity::Debug => Style::new().cyan(),
            Severity::Info => Style::new().green(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Error | Severity::Critical => Style::new().red().bold(),
        };
        self.paint(severity.as_str(), style)
    }

    pub(crate) fn source(&self, text: &str) -> String {
        self.paint(text, Style::new().blue().dimmed())
    }

    pub(crate) fn key(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_black().bold())
    }

    /// Bullets and continuation markers.
    pub(crate) fn marker(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_black().dimmed())
    }
}
