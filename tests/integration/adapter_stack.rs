//! Integration tests for context injection adapters and call instrumentation

use super::test_utils::{compact_logger, isolated, json_lines, keys, strip_ansi, tree_logger};
use ctxlog::{
    CallLogger, ContextLogger, Emit, ErrorLogger, Formatter, LogError, MemorySink, MergedRecord,
    Sink,
};

struct MessageOnly;

impl Formatter for MessageOnly {
    fn render(&self, record: &MergedRecord) -> String {
        record.message.clone()
    }
}

#[test]
fn test_stacked_adapters_scenario_order() {
    let (logger, memory) = compact_logger("payments");
    logger.add_context("env", "prod");
    let request = ContextLogger::bind(logger.clone(), "request_id", "req-9").unwrap();
    let user = ContextLogger::bind(request, "user_id", "u-1").unwrap();

    user.info_with("Payment completed", [("amount", 42)]);

    let records = json_lines(&memory);
    assert_eq!(
        keys(&records[0]),
        vec!["level", "time", "message", "env", "request_id", "user_id", "amount"]
    );
    assert_eq!(records[0]["request_id"], "req-9");
    assert_eq!(records[0]["user_id"], "u-1");
}

#[test]
fn test_adapter_does_not_leak_into_base() {
    let (logger, memory) = compact_logger("payments");
    let adapter = ContextLogger::bind(logger.clone(), "request_id", "req-9").unwrap();
    adapter.info("through adapter");
    logger.info("direct");
    let records = json_lines(&memory);
    assert_eq!(records[0]["request_id"], "req-9");
    assert!(records[1].get("request_id").is_none());
}

#[test]
fn test_bind_rejects_emitter_without_capable_formatter() {
    let (builder, _registry) = isolated("bare");
    let logger = builder.sink(Sink::new(MemorySink::new(), MessageOnly)).build();
    let result = ContextLogger::bind(logger.clone(), "request_id", "x");
    assert!(matches!(result, Err(LogError::Configuration(_))));
    assert!(CallLogger::new(logger.clone()).is_err());
    assert!(ErrorLogger::new(logger, true).is_err());
}

#[test]
fn test_adapter_over_tree_renderer() {
    let (logger, memory) = tree_logger("api");
    let adapter = ContextLogger::bind(logger, "request_id", "r1").unwrap();
    adapter.warning("slow response");
    let text = strip_ansi(&memory.lines()[0]);
    assert!(text.contains("[WARNING] api: slow response"));
    assert!(text.ends_with("└─ request_id=\"r1\""));
}

#[test]
fn test_call_instrumentation_through_adapter() {
    let (logger, memory) = compact_logger("calc");
    let adapter = ContextLogger::bind(logger, "job_id", 7).unwrap();
    let calls = CallLogger::new(adapter.clone()).unwrap();
    let errors = ErrorLogger::new(adapter, true).unwrap();

    assert_eq!(calls.call("square", [("x", 3)], || 9), 9);
    let swallowed: Result<Option<i32>, String> =
        errors.call("parse", [("input", "abc")], || Err("not a number".to_string()));
    assert_eq!(swallowed, Ok(None));

    let records = json_lines(&memory);
    assert_eq!(records[0]["message"], "func square called");
    assert_eq!(records[0]["job_id"], 7);
    assert_eq!(records[0]["args"]["x"], 3);
    assert_eq!(records[1]["level"], "ERROR");
    assert_eq!(records[1]["message"], "not a number");
    assert_eq!(records[1]["function_name"], "parse");
    assert_eq!(records[1]["job_id"], 7);
}
