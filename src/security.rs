//! Security Validation Module
//!
//! Protects against malicious or malformed requests that could:
//! - Exhaust server resources (oversized URIs or headers)
//! - Smuggle relative segments into a signed asset path
//!
//! Returns appropriate HTTP status codes:
//! - 414 URI Too Long - Request URI exceeds limit
//! - 431 Request Header Fields Too Large - Headers exceed limit
//! - 400 Bad Request - Path traversal in an asset path
//!
//! Asset paths are never resolved against a filesystem; the checks here are
//! purely textual.

use crate::constants::{DEFAULT_MAX_HEADER_SIZE, DEFAULT_MAX_URI_LENGTH};

/// Security validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// Request headers too large (431)
    HeadersTooLarge { total_size: usize, limit: usize },
    /// Path traversal attempt detected (400)
    PathTraversal { path: String },
    /// URI too long (414)
    UriTooLong { length: usize, limit: usize },
}

impl SecurityError {
    pub fn status_code(&self) -> u16 {
        match self {
            SecurityError::HeadersTooLarge { .. } => 431,
            SecurityError::PathTraversal { .. } => 400,
            SecurityError::UriTooLong { .. } => 414,
        }
    }

    /// Reason phrase used as the JSON `error` field
    pub fn reason(&self) -> &'static str {
        match self {
            SecurityError::HeadersTooLarge { .. } => "Request Header Fields Too Large",
            SecurityError::PathTraversal { .. } => "Bad Request",
            SecurityError::UriTooLong { .. } => "URI Too Long",
        }
    }
}

impl std::fmt::Display for SecurityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityError::HeadersTooLarge { total_size, limit } => {
                write!(
                    f,
                    "Total header size {} exceeds limit {}",
                    total_size, limit
                )
            }
            SecurityError::PathTraversal { path } => {
                write!(f, "Path traversal attempt detected: {}", path)
            }
            SecurityError::UriTooLong { length, limit } => {
                write!(f, "URI length {} exceeds limit {}", length, limit)
            }
        }
    }
}

impl std::error::Error for SecurityError {}

/// Request-level limits
#[derive(Debug, Clone)]
pub struct SecurityLimits {
    /// Maximum total header size in bytes (default: 64 KB)
    pub max_header_size: usize,
    /// Maximum URI length (default: 8192 bytes)
    pub max_uri_length: usize,
}

impl Default for SecurityLimits {
    fn default() -> Self {
        Self {
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            max_uri_length: DEFAULT_MAX_URI_LENGTH,
        }
    }
}

/// Validate total header size
pub fn validate_header_size(total_size: usize, limit: usize) -> Result<(), SecurityError> {
    if total_size > limit {
        return Err(SecurityError::HeadersTooLarge { total_size, limit });
    }
    Ok(())
}

/// Validate URI length
pub fn validate_uri_length(uri: &str, limit: usize) -> Result<(), SecurityError> {
    let length = uri.len();
    if length > limit {
        return Err(SecurityError::UriTooLong { length, limit });
    }
    Ok(())
}

/// Check for path traversal attempts
///
/// Detects:
/// - `..` or `.` segments, with either `/` or `\` separators
/// - URL-encoded dots (`%2e`), which would decode into the above downstream
/// - NUL bytes (path truncation)
pub fn check_path_traversal(path: &str) -> Result<(), SecurityError> {
    let traversal = || SecurityError::PathTraversal {
        path: path.to_string(),
    };

    if path.contains('\0') {
        return Err(traversal());
    }

    if path.to_ascii_lowercase().contains("%2e") {
        return Err(traversal());
    }

    if path
        .split(|c: char| c == '/' || c == '\\')
        .any(|segment| segment == ".." || segment == ".")
    {
        return Err(traversal());
    }

    Ok(())
}
