//! Integration tests for Configuration System

use ctxlog::factory::{build_formatter, from_config};
use ctxlog::{ConfigLoader, ContextMap, LoggerOptions, MergedRecord, Severity};
use chrono::Utc;
use tempfile::TempDir;

fn record() -> MergedRecord {
    MergedRecord {
        severity: Severity::Info,
        timestamp: Utc::now(),
        message: "hello".to_string(),
        source: "svc".to_string(),
        context: ContextMap::new(),
    }
}

#[test]
fn test_config_file_drives_factory_emitter() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("logging.toml");

    std::fs::write(
        &config_file,
        r#"
env = "dev"
level = "warning"
color = false
show_logger_name = false
context_indent = 2
success_msg = "finished"
failure_msg = "crashed"
suppress_errors = true
output = "stderr"

[params]
service = "billing"
replicas = 3

[diagnostics]
level = "info"
format = "json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.diagnostics.format, "json");

    let logger = from_config("billing.worker", &config).unwrap();
    assert_eq!(logger.level(), Severity::Warning);
    assert_eq!(logger.scope_defaults().success_message, "finished");
    assert_eq!(logger.scope_defaults().failure_message, "crashed");
    assert!(logger.scope_defaults().suppress_errors);
    assert!(logger.supports_context_params());

    let options = LoggerOptions::from_config(&config).unwrap();
    let formatter =
        build_formatter(config.env().unwrap(), &config.formatter_params(), &options).unwrap();
    assert_eq!(
        formatter.render(&record()).lines().nth(1),
        Some("  └─ replicas=3 service=\"billing\"")
    );
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "env = \"staging\"\noutput = \"syslog\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(from_config("svc", &config).is_err());
}

#[test]
fn test_datefmt_applies_to_both_formatters() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("datefmt.toml");
    std::fs::write(&config_file, "datefmt = \"%Y\"\ncolor = false\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let options = LoggerOptions::from_config(&config).unwrap();
    let year = Utc::now().format("%Y").to_string();

    let compact = build_formatter(ctxlog::Env::Pro, &ContextMap::new(), &options).unwrap();
    let line: serde_json::Value = serde_json::from_str(&compact.render(&record())).unwrap();
    assert_eq!(line["time"], year.as_str());

    let tree = build_formatter(ctxlog::Env::Dev, &ContextMap::new(), &options).unwrap();
    assert!(tree.render(&record()).starts_with(&format!("{} [INFO] svc: hello", year)));
}

#[test]
fn test_invalid_datefmt_in_file_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("datefmt.toml");
    std::fs::write(&config_file, "datefmt = \"%Y-%Q\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().starts_with("datefmt:"));
    assert!(from_config("svc", &config).is_err());
}
