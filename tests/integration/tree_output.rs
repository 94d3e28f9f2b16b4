//! Integration tests for the tree renderer

use super::test_utils::{strip_ansi, tree_logger, without_time};
use chrono::{DateTime, Utc};
use ctxlog::{
    ContextMap, ContextObject, ContextValue, Emit, Formatter, MergedRecord, Severity, TreeOptions,
    TreeRenderer,
};
use std::fmt;

#[derive(Debug)]
struct Opaque;

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<opaque handle>")
    }
}

impl ContextObject for Opaque {}

fn record(message: &str, context: ContextMap) -> MergedRecord {
    MergedRecord {
        severity: Severity::Error,
        timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc),
        message: message.to_string(),
        source: "checkout".to_string(),
        context,
    }
}

fn renderer(color: bool) -> TreeRenderer {
    TreeRenderer::new(TreeOptions {
        color,
        ..TreeOptions::default()
    })
}

fn rich_context() -> ContextMap {
    ContextMap::new()
        .with("amount", 42)
        .with("order", ContextMap::new().with("id", "A-1").with("tags", vec!["x", "y"]))
        .with("ok", false)
}

#[test]
fn test_color_neutrality() {
    let record = record("Payment failed\nretrying", rich_context());
    let colored = renderer(true).render(&record);
    let plain = renderer(false).render(&record);
    assert_ne!(colored, plain);
    assert!(colored.contains('\u{1b}'));
    assert_eq!(strip_ansi(&colored), plain);
}

#[test]
fn test_block_shape_scalars_then_sorted_complex() {
    let out = renderer(false).render(&record("m", rich_context()));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "2024-05-01T12:30:00.000Z [ERROR] checkout: m",
            "    └─ amount=42 ok=false",
            "       order:",
            "        id=\"A-1\"",
            "        tags:",
            "          [0]=\"x\"",
            "          [1]=\"y\"",
        ]
    );
}

#[test]
fn test_fallback_three_levels_deep() {
    let context = ContextMap::new().with(
        "outer",
        ContextMap::new().with(
            "middle",
            ContextMap::new().with("inner", ContextValue::object(Opaque)),
        ),
    );
    let out = renderer(false).render(&record("m", context));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        &lines[1..],
        &[
            "    └─",
            "       outer:",
            "        middle:",
            "          inner=<opaque handle>",
        ]
    );
}

#[test]
fn test_fallback_inside_sequence_of_mappings() {
    let context = ContextMap::new().with(
        "outer",
        vec![ContextValue::from(
            ContextMap::new().with("inner", ContextValue::object(Opaque)),
        )],
    );
    let out = renderer(false).render(&record("m", context));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        &lines[1..],
        &[
            "    └─",
            "       outer:",
            "        [0]:",
            "          inner=<opaque handle>",
        ]
    );
}

#[test]
fn test_object_renders_its_structured_form() {
    let stamp = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
        .unwrap()
        .with_timezone(&Utc);
    let out = renderer(false).render(&record("m", ContextMap::from([("at", stamp)])));
    assert!(out.ends_with("└─ at=\"2024-01-02T03:04:05+00:00\""));
}

#[test]
fn test_emitter_writes_tree_lines() {
    let (logger, memory) = tree_logger("checkout");
    logger.info_with("Payment completed", [("order_id", "ABC-123")]);
    let text = without_time(&memory.lines()[0]);
    assert_eq!(
        text,
        "[INFO] checkout: Payment completed\n    └─ order_id=\"ABC-123\""
    );
}

#[test]
fn test_empty_context_is_header_only() {
    let (logger, memory) = tree_logger("checkout");
    logger.debug("quiet");
    assert_eq!(without_time(&memory.lines()[0]), "[DEBUG] checkout: quiet");
}
