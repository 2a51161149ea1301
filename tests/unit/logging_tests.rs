// Logging tests
//
// The global subscriber can only be installed once per process, so these
// tests check that repeated and mixed initialization never fails.

use utsushi::config::{LogFormat, LoggingConfig};
use utsushi::logging::{init_subscriber, init_with_config};

#[test]
fn test_can_initialize_subscriber_repeatedly() {
    assert!(init_subscriber().is_ok());
    assert!(init_subscriber().is_ok());

    tracing::info!(request_id = "test", "logging initialized");
}

#[test]
fn test_init_with_text_config_after_default() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Text,
    };
    assert!(init_subscriber().is_ok());
    assert!(init_with_config(&config).is_ok());
}
