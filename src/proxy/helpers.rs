//! Request utility functions.
//!
//! This module contains helper functions for request processing:
//! - Query parameter parsing
//! - Header size accounting
//! - Client IP detection (X-Forwarded-For aware)

use std::collections::HashMap;

use pingora_http::RequestHeader;
use pingora_proxy::Session;

use crate::error::IssueError;

/// Extract query parameters from URI.
///
/// Parses the query string from the request URI and returns key-value pairs.
/// See [`parse_query`] for the decoding rules.
pub fn extract_query_params(req: &RequestHeader) -> Result<HashMap<String, String>, IssueError> {
    parse_query(req.uri.query().unwrap_or_default())
}

/// Parse a raw query string (without the leading `?`).
///
/// Values are form-decoded: `+` becomes a space, then percent escapes are
/// resolved. Pairs without `=` are ignored and the last value of a repeated
/// key wins. A value that does not decode to UTF-8 is an input error naming
/// the key.
pub fn parse_query(query: &str) -> Result<HashMap<String, String>, IssueError> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            let value = value.replace('+', " ");
            let decoded = urlencoding::decode(&value).map_err(|_| {
                IssueError::input(format!("Malformed query parameter '{}'", key))
            })?;
            params.insert(key.to_string(), decoded.into_owned());
        }
    }
    Ok(params)
}

/// Total size of header names and values in bytes.
pub fn total_header_size(req: &RequestHeader) -> usize {
    req.headers
        .iter()
        .map(|(name, value)| name.as_str().len() + value.len())
        .sum()
}

/// Extract client IP address from session (X-Forwarded-For aware).
///
/// The header can contain multiple IPs: `"client, proxy1, proxy2"`.
/// The first IP is the original client, which is what we return.
pub fn get_client_ip(session: &Session) -> String {
    if let Some(forwarded_for) = session
        .req_header()
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(client_ip) = forwarded_for.split(',').next() {
            return client_ip.trim().to_string();
        }
    }

    // Fall back to direct connection IP
    session
        .client_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
