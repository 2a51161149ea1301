// Request pipeline module - per-request context carried through the service hooks

use std::time::Instant;
use uuid::Uuid;

/// Request context that holds information about an HTTP request
/// as it flows from `request_filter` to `logging`
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    started_at: Instant,
}

impl RequestContext {
    /// Create a new RequestContext from HTTP request information
    /// Automatically generates a unique request ID (UUID v4) and captures the start instant
    pub fn new(method: String, path: String) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            started_at: Instant::now(),
        }
    }

    /// Record the request line once the request header has been read
    pub fn set_request_line(&mut self, method: String, path: String) {
        self.method = method;
        self.path = path;
    }

    /// Get the unique request ID
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Get the HTTP method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Get the request path (without query string)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Milliseconds elapsed since the context was created
    pub fn elapsed_ms(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("GET".to_string(), "/".to_string())
    }
}
