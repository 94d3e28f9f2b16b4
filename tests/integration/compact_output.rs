//! Integration tests for the compact JSON line format

use super::test_utils::{compact_logger, json_lines, keys};
use ctxlog::{ContextMap, ContextObject, ContextValue, Emit};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
struct Opaque;

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<opaque handle>")
    }
}

impl ContextObject for Opaque {}

#[test]
fn test_every_primitive_round_trips() {
    let (logger, memory) = compact_logger("types");
    logger.info_with(
        "scalars",
        ContextMap::new()
            .with("text", "héllo \"quoted\"\n\ttab")
            .with("int", -7)
            .with("big", u64::MAX)
            .with("float", 2.5)
            .with("yes", true)
            .with("none", ContextValue::Null),
    );
    let record = &json_lines(&memory)[0];
    assert_eq!(record["text"], "héllo \"quoted\"\n\ttab");
    assert_eq!(record["int"], -7);
    assert_eq!(record["big"], u64::MAX);
    assert_eq!(record["float"], 2.5);
    assert_eq!(record["yes"], true);
    assert!(record["none"].is_null());
}

#[test]
fn test_one_line_per_record() {
    let (logger, memory) = compact_logger("svc");
    logger.error("first line\nsecond line");
    let lines = memory.lines();
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].contains('\n'));
    assert_eq!(json_lines(&memory)[0]["message"], "first line\nsecond line");
}

#[test]
fn test_reserved_keys_are_relocated() {
    let (logger, memory) = compact_logger("svc");
    logger.add_context("level", "custom");
    logger.info_with("real message", [("message", "shadow"), ("user", "u1")]);
    let record = &json_lines(&memory)[0];
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["message"], "real message");
    assert_eq!(record["svc.level"], "custom");
    assert_eq!(record["svc.message"], "shadow");
    assert_eq!(
        keys(record),
        vec!["level", "time", "message", "svc.level", "svc.message", "user"]
    );
}

#[test]
fn test_nested_values_and_fallback_three_levels_deep() {
    let (logger, memory) = compact_logger("svc");
    let deep = ContextMap::new().with(
        "outer",
        ContextMap::new().with(
            "middle",
            ContextMap::new().with("inner", ContextValue::object(Opaque)),
        ),
    );
    logger.info_with("nested", deep);
    let record = &json_lines(&memory)[0];
    assert_eq!(
        record["outer"],
        json!({"middle": {"inner": "<opaque handle>"}})
    );
}

#[test]
fn test_fallback_inside_sequence_of_mappings() {
    let (logger, memory) = compact_logger("svc");
    let deep = ContextMap::new().with(
        "outer",
        vec![ContextValue::from(
            ContextMap::new().with("inner", ContextValue::object(Opaque)),
        )],
    );
    logger.info_with("nested", deep);
    let record = &json_lines(&memory)[0];
    assert_eq!(record["outer"], json!([{"inner": "<opaque handle>"}]));
}

#[test]
fn test_relocated_key_keeps_existing_namespaced_key() {
    let (logger, memory) = compact_logger("svc");
    logger.info_with("m", [("svc.message", "mine"), ("message", "shadow")]);
    let record = &json_lines(&memory)[0];
    assert_eq!(record["message"], "m");
    assert_eq!(record["svc.message"], "mine");
    assert_eq!(record["svc.message.1"], "shadow");
    assert_eq!(
        keys(record),
        vec!["level", "time", "message", "svc.message", "svc.message.1"]
    );
}

#[test]
fn test_time_is_rfc3339_utc_with_millis() {
    let (logger, memory) = compact_logger("svc");
    logger.info("tick");
    let record = &json_lines(&memory)[0];
    let time = record["time"].as_str().unwrap();
    assert!(time.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(time).is_ok());
    assert_eq!(time.len(), "2024-05-01T12:30:00.000Z".len());
}

#[test]
fn test_later_frame_wins_but_keeps_position() {
    let (logger, memory) = compact_logger("svc");
    logger.add_context("region", "eu");
    logger.add_context("tier", "gold");
    logger.info_with("m", [("region", "us")]);
    let record = &json_lines(&memory)[0];
    assert_eq!(record["region"], "us");
    assert_eq!(keys(record), vec!["level", "time", "message", "region", "tier"]);
}
