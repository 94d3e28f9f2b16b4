//! Integration tests for the emitter registry

use ctxlog::{CompactEncoder, Emit, EmitterRegistry, Logger, MemorySink, Severity, Sink};

#[test]
fn test_apply_level_filters_all_live_emitters() {
    let registry = EmitterRegistry::new();
    let memory = MemorySink::new();
    let loggers: Vec<Logger> = ["a", "b", "c"]
        .iter()
        .map(|name| {
            Logger::builder(*name)
                .registry(&registry)
                .sink(Sink::new(memory.clone(), CompactEncoder::new()))
                .build()
        })
        .collect();

    assert_eq!(registry.apply_level(Severity::Error), 3);
    for logger in &loggers {
        logger.warning("filtered");
        logger.error("kept");
    }
    assert_eq!(memory.lines().len(), 3);
}

#[test]
fn test_dropped_emitters_are_not_updated() {
    let registry = EmitterRegistry::new();
    let kept = Logger::builder("kept").registry(&registry).build();
    {
        let _gone = Logger::builder("gone").registry(&registry).build();
        assert_eq!(registry.len(), 2);
    }
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.apply_level(Severity::Info), 1);
    assert_eq!(kept.level(), Severity::Info);
}

#[test]
fn test_private_registries_are_isolated() {
    let first = EmitterRegistry::new();
    let second = EmitterRegistry::new();
    let a = Logger::builder("a").registry(&first).build();
    let b = Logger::builder("b").registry(&second).build();
    first.apply_level(Severity::Critical);
    assert_eq!(a.level(), Severity::Critical);
    assert_eq!(b.level(), Severity::Debug);
}

#[test]
fn test_emitters_join_global_registry_by_default() {
    let logger = Logger::builder("global-member").build();
    assert!(!ctxlog::registry::global().is_empty());
    drop(logger);
}

#[test]
fn test_concurrent_build_and_broadcast() {
    let registry = EmitterRegistry::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let logger = Logger::builder(format!("t{}", i)).registry(&registry).build();
                registry.apply_level(Severity::Warning);
                logger
            })
        })
        .collect();
    let loggers: Vec<Logger> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    registry.apply_level(Severity::Error);
    for logger in &loggers {
        assert_eq!(logger.level(), Severity::Error);
    }
}
