// Error types module

use thiserror::Error;

/// Errors produced while issuing a signed URL
///
/// Categorizes failures into the three kinds a caller can observe, each with
/// its own HTTP status mapping. Messages never contain credential values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// Required credentials are missing from process configuration
    #[error("{0}")]
    Configuration(String),

    /// Caller-supplied parameter is missing or malformed
    #[error("{0}")]
    Input(String),

    /// Unexpected failure while building or signing the URL
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },
}

impl IssueError {
    pub fn configuration(message: impl Into<String>) -> Self {
        IssueError::Configuration(message.into())
    }

    pub fn input(message: impl Into<String>) -> Self {
        IssueError::Input(message.into())
    }

    pub fn internal(message: impl Into<String>, detail: impl Into<String>) -> Self {
        IssueError::Internal {
            message: message.into(),
            detail: detail.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            IssueError::Configuration(_) => 500,
            IssueError::Input(_) => 400,
            IssueError::Internal { .. } => 500,
        }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            IssueError::Configuration(_) => "configuration",
            IssueError::Input(_) => "input",
            IssueError::Internal { .. } => "internal",
        }
    }

    /// JSON body sent to the caller
    ///
    /// Internal errors carry an additional `message` field with the detail.
    pub fn to_json_body(&self) -> serde_json::Value {
        match self {
            IssueError::Configuration(message) | IssueError::Input(message) => {
                serde_json::json!({ "error": message })
            }
            IssueError::Internal { message, detail } => {
                serde_json::json!({ "error": message, "message": detail })
            }
        }
    }
}

/// Errors raised while loading or validating configuration at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Invalid value for environment variable '{name}': {value}")]
    InvalidEnvVar { name: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
