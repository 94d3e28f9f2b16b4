//! Integration tests for stream redirection inside scopes

use super::test_utils::compact_logger;
use ctxlog::streams;
use ctxlog::{MemorySink, Redirect};
use std::sync::Mutex;

// The abstract streams are process-wide.
static STREAMS_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_redirect_restored_after_clean_exit() {
    let _guard = STREAMS_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (outer_logger, _) = compact_logger("outer");
    let (inner_logger, _) = compact_logger("inner");
    let outer_out = MemorySink::new();
    let inner_out = MemorySink::new();
    let inner_err = MemorySink::new();

    let outer = outer_logger
        .enter_redirected(Redirect::discard().out_to(outer_out.clone()))
        .unwrap();
    streams::out("before").unwrap();
    {
        let inner = inner_logger
            .enter_redirected(
                Redirect::discard()
                    .out_to(inner_out.clone())
                    .err_to(inner_err.clone()),
            )
            .unwrap();
        streams::out("inside").unwrap();
        streams::err("inside err").unwrap();
        inner.succeed();
    }
    streams::out("after").unwrap();
    outer.succeed();

    assert_eq!(outer_out.lines(), vec!["before", "after"]);
    assert_eq!(inner_out.lines(), vec!["inside"]);
    assert_eq!(inner_err.lines(), vec!["inside err"]);
}

#[test]
fn test_redirect_restored_after_failure_and_panic() {
    let _guard = STREAMS_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let (outer_logger, _) = compact_logger("outer");
    let (inner_logger, inner_records) = compact_logger("inner");
    let outer_out = MemorySink::new();

    let outer = outer_logger
        .enter_redirected(Redirect::discard().out_to(outer_out.clone()))
        .unwrap();

    let failed: Result<Option<()>, std::io::Error> = inner_logger
        .enter_redirected(Redirect::discard())
        .unwrap()
        .run(|_| {
            streams::out("swallowed by discard").unwrap();
            Err(std::io::Error::new(std::io::ErrorKind::Other, "broken"))
        });
    assert!(failed.is_err());
    streams::out("after failure").unwrap();

    let panicking = inner_logger.clone();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _scope = panicking.enter_redirected(Redirect::discard()).unwrap();
        panic!("boom");
    }));
    assert!(outcome.is_err());
    streams::out("after panic").unwrap();
    outer.succeed();

    assert_eq!(outer_out.lines(), vec!["after failure", "after panic"]);
    assert_eq!(inner_records.lines().len(), 2);
}
