// Error type unit tests

use utsushi::error::{ConfigError, IssueError};

#[test]
fn test_issue_error_kinds() {
    assert_eq!(IssueError::configuration("x").kind(), "configuration");
    assert_eq!(IssueError::input("x").kind(), "input");
    assert_eq!(IssueError::internal("x", "y").kind(), "internal");
}

#[test]
fn test_issue_error_display() {
    assert_eq!(
        IssueError::input("Image path is required").to_string(),
        "Image path is required"
    );
    assert_eq!(
        IssueError::internal("Failed to generate signed URL", "clock error").to_string(),
        "Failed to generate signed URL: clock error"
    );
}

#[test]
fn test_configuration_error_body() {
    let body = IssueError::configuration("Media signing credentials not configured").to_json_body();
    assert_eq!(
        body,
        serde_json::json!({ "error": "Media signing credentials not configured" })
    );
}

#[test]
fn test_internal_error_body() {
    let body = IssueError::internal("Failed to generate signed URL", "boom").to_json_body();
    assert_eq!(
        body,
        serde_json::json!({ "error": "Failed to generate signed URL", "message": "boom" })
    );
}

#[test]
fn test_config_error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: ConfigError = io.into();
    assert!(err.to_string().starts_with("Failed to read config file"));
}

#[test]
fn test_config_error_invalid_env_var_display() {
    let err = ConfigError::InvalidEnvVar {
        name: "UTSUSHI_PORT".to_string(),
        value: "eighty".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid value for environment variable 'UTSUSHI_PORT': eighty"
    );
}
