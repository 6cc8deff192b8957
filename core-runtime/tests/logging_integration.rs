//! Integration tests for logging bootstrap

use bridge_traits::logging::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, redact_uri, LogFormat, LoggingConfig};
use std::sync::Arc;

#[test]
fn test_logging_initializes_once() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_filter("playctl=debug")
        .with_logger_sink(Arc::new(ConsoleLogger::default()));

    assert!(init_logging(config.clone()).is_ok());
    tracing::info!(target: "playctl::state", "logging initialized");

    // A second global subscriber is refused instead of panicking.
    assert!(init_logging(config).is_err());
}

#[test]
fn test_redacted_uri_keeps_path() {
    let redacted = redact_uri("https://media.example.com/show/ep1.m3u8?sig=deadbeef");
    assert!(redacted.starts_with("https://media.example.com/show/ep1.m3u8"));
    assert!(!redacted.contains("deadbeef"));
}
