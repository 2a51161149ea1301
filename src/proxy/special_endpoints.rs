//! Endpoint handlers for the service.
//!
//! This module provides response generators for every route:
//! - `/issue` (and its legacy alias) - Signed URL issuance
//! - `/health` - Liveness check
//! - `/ready` - Readiness check (credentials present)
//! - `/metrics` - Prometheus metrics export
//!
//! # Design
//!
//! Functions return `EndpointResponse` instead of writing directly to session.
//! This avoids borrow checker issues and keeps response generation testable.
//! The caller handles writing the response to the session.

use std::time::Instant;

use crate::error::IssueError;
use crate::metrics::Metrics;
use crate::pipeline::RequestContext;
use crate::signing::UrlSigner;

use super::helpers;

/// Query parameter carrying the asset path
pub const PATH_PARAM: &str = "path";

/// Query parameter carrying the transformation options
pub const OPTIONS_PARAM: &str = "options";

/// Response from an endpoint handler.
#[derive(Debug, Clone)]
pub struct EndpointResponse {
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: &'static str,
    /// Additional response headers
    pub headers: Vec<(&'static str, String)>,
    /// Response body
    pub body: String,
}

impl EndpointResponse {
    /// Create a JSON response with the given status and body.
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body,
        }
    }

    /// Create a plain text response (for Prometheus metrics).
    pub fn prometheus(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; version=0.0.4",
            headers: Vec::new(),
            body,
        }
    }

    /// Add a response header.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Look up an additional header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Generate response for the signed URL endpoint.
///
/// Only `GET` is served. Every failure is translated into a JSON error body;
/// nothing escapes this function as a fault.
pub fn handle_issue(
    ctx: &RequestContext,
    query: &str,
    signer: &UrlSigner,
    metrics: &Metrics,
) -> EndpointResponse {
    if ctx.method() != "GET" {
        tracing::debug!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            "Method not allowed on issue endpoint"
        );
        return EndpointResponse::json(
            405,
            serde_json::json!({ "error": "Method not allowed" }).to_string(),
        )
        .with_header("Allow", "GET");
    }

    // Missing credentials outrank a malformed query.
    let query_params = match signer
        .ensure_configured()
        .and_then(|_| helpers::parse_query(query))
    {
        Ok(params) => params,
        Err(err) => return issue_error(ctx, None, err, metrics),
    };
    let asset_path = query_params.get(PATH_PARAM).map(String::as_str);
    let options = query_params.get(OPTIONS_PARAM).map(String::as_str);

    match signer.issue_signed_url(asset_path, options) {
        Ok(signed) => {
            metrics.increment_urls_issued();
            tracing::info!(
                request_id = %ctx.request_id(),
                asset_path = asset_path.unwrap_or_default(),
                timestamp = signed.timestamp(),
                "Issued signed URL"
            );

            let body = serde_json::json!({ "url": signed.as_str() }).to_string();
            EndpointResponse::json(200, body).with_header("Cache-Control", "no-store")
        }
        Err(err) => issue_error(ctx, asset_path, err, metrics),
    }
}

fn issue_error(
    ctx: &RequestContext,
    asset_path: Option<&str>,
    err: IssueError,
    metrics: &Metrics,
) -> EndpointResponse {
    metrics.increment_issue_error(err.kind());
    log_issue_error(ctx, asset_path, &err);
    EndpointResponse::json(err.status_code(), err.to_json_body().to_string())
}

fn log_issue_error(ctx: &RequestContext, asset_path: Option<&str>, err: &IssueError) {
    match err {
        IssueError::Input(message) => tracing::debug!(
            request_id = %ctx.request_id(),
            asset_path = asset_path.unwrap_or_default(),
            error = %message,
            "Rejected issue request"
        ),
        IssueError::Configuration(message) => tracing::error!(
            request_id = %ctx.request_id(),
            error = %message,
            "Cannot issue signed URL"
        ),
        IssueError::Internal { message, detail } => tracing::error!(
            request_id = %ctx.request_id(),
            asset_path = asset_path.unwrap_or_default(),
            error = %message,
            detail = %detail,
            "Signed URL generation failed"
        ),
    }
}

/// Generate response for /health endpoint.
///
/// Returns health status with uptime and version information.
pub fn handle_health(start_time: Instant) -> EndpointResponse {
    let uptime_seconds = start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    let body = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "version": version
    })
    .to_string();

    EndpointResponse::json(200, body)
}

/// Generate response for /ready endpoint.
///
/// The service is ready only when it can sign, i.e. all credentials are set.
pub fn handle_ready(signer: &UrlSigner) -> EndpointResponse {
    if signer.is_configured() {
        return EndpointResponse::json(200, serde_json::json!({ "status": "ready" }).to_string());
    }

    let body = serde_json::json!({
        "status": "unavailable",
        "reason": crate::signing::signer::CREDENTIALS_NOT_CONFIGURED
    })
    .to_string();

    EndpointResponse::json(503, body)
}

/// Generate response for /metrics endpoint.
pub fn handle_metrics(metrics: &Metrics) -> EndpointResponse {
    EndpointResponse::prometheus(metrics.export_prometheus())
}

/// Generate response for unknown routes.
pub fn handle_not_found() -> EndpointResponse {
    EndpointResponse::json(404, serde_json::json!({ "error": "Not found" }).to_string())
}
