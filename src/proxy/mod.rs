// Proxy module - Pingora ProxyHttp implementation
// Every request is answered locally from request_filter; nothing is proxied upstream

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_http::ResponseHeader;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::Config;
use crate::constants::RETRY_AFTER_SECS;
use crate::error::ConfigError;
use crate::metrics::Metrics;
use crate::pipeline::RequestContext;
use crate::security::{self, SecurityLimits};
use crate::signing::UrlSigner;

pub mod helpers;
pub mod special_endpoints;

use special_endpoints::EndpointResponse;

/// UtsushiService implements the Pingora ProxyHttp trait
/// Handles routing, request limits and signed URL issuance
pub struct UtsushiService {
    signer: Arc<UrlSigner>,
    metrics: Arc<Metrics>,
    issue_paths: Vec<String>,
    request_semaphore: Arc<Semaphore>,
    /// Security validation limits (headers, URI)
    security_limits: SecurityLimits,
    /// Service start time (for uptime calculation in /health endpoint)
    start_time: Instant,
}

impl UtsushiService {
    /// Create a new UtsushiService from configuration
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let signer = UrlSigner::from_config(&config.media)?;

        Ok(Self {
            signer: Arc::new(signer),
            metrics: Arc::new(Metrics::new()),
            issue_paths: config.issue_paths(),
            request_semaphore: Arc::new(Semaphore::new(config.server.max_concurrent_requests)),
            security_limits: config.server.security_limits.to_security_limits(),
            start_time: Instant::now(),
        })
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Get a reference to the signer
    pub fn signer(&self) -> &Arc<UrlSigner> {
        &self.signer
    }

    /// Whether `path` is served by the signing endpoint
    pub fn is_issue_path(&self, path: &str) -> bool {
        self.issue_paths.iter().any(|p| p == path)
    }

    /// Apply the concurrency cap, then the URI and header limits
    ///
    /// On success the returned permit must be held until the response is
    /// written. On rejection the response to send is returned instead.
    pub fn admit(
        &self,
        ctx: &RequestContext,
        uri: &str,
        header_size: usize,
    ) -> std::result::Result<SemaphorePermit<'_>, EndpointResponse> {
        let permit = match self.request_semaphore.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    "Rejecting request due to max concurrent requests reached"
                );
                self.metrics.increment_concurrency_limit_rejection();

                return Err(rejection(
                    503,
                    "Service Temporarily Unavailable",
                    format!(
                        "Server has reached maximum concurrent request limit. Please retry after {} seconds.",
                        RETRY_AFTER_SECS
                    ),
                )
                .with_header("Retry-After", RETRY_AFTER_SECS.to_string()));
            }
        };

        if let Err(security_error) =
            security::validate_uri_length(uri, self.security_limits.max_uri_length)
        {
            tracing::warn!(
                request_id = %ctx.request_id(),
                uri_length = uri.len(),
                limit = self.security_limits.max_uri_length,
                error = %security_error,
                "URI too long"
            );
            self.metrics.increment_security_uri_too_long();
            return Err(rejection_for(&security_error));
        }

        if let Err(security_error) =
            security::validate_header_size(header_size, self.security_limits.max_header_size)
        {
            tracing::warn!(
                request_id = %ctx.request_id(),
                header_size = header_size,
                limit = self.security_limits.max_header_size,
                error = %security_error,
                "Headers too large"
            );
            self.metrics.increment_security_headers_too_large();
            return Err(rejection_for(&security_error));
        }

        Ok(permit)
    }

    /// Produce the response for a request that passed admission
    pub fn route(&self, ctx: &RequestContext, query: &str) -> EndpointResponse {
        match ctx.path() {
            "/health" => special_endpoints::handle_health(self.start_time),
            "/ready" => special_endpoints::handle_ready(&self.signer),
            "/metrics" => special_endpoints::handle_metrics(&self.metrics),
            path if self.is_issue_path(path) => {
                special_endpoints::handle_issue(ctx, query, &self.signer, &self.metrics)
            }
            _ => special_endpoints::handle_not_found(),
        }
    }

    async fn write_response(&self, session: &mut Session, response: EndpointResponse) -> Result<()> {
        let mut header = ResponseHeader::build(response.status, None)?;
        header.insert_header("Content-Type", response.content_type)?;
        header.insert_header("Content-Length", response.body.len().to_string())?;
        for (name, value) in response.headers {
            header.insert_header(name, value)?;
        }

        session
            .write_response_header(Box::new(header), false)
            .await?;
        session
            .write_response_body(Some(response.body.into()), true)
            .await?;
        Ok(())
    }
}

/// JSON rejection body shared by the request-limit checks
fn rejection(status: u16, error: &str, message: String) -> EndpointResponse {
    let body = serde_json::json!({
        "error": error,
        "message": message,
        "status": status
    })
    .to_string();
    EndpointResponse::json(status, body)
}

fn rejection_for(error: &security::SecurityError) -> EndpointResponse {
    rejection(error.status_code(), error.reason(), error.to_string())
}

#[async_trait]
impl ProxyHttp for UtsushiService {
    type CTX = RequestContext;

    /// Create a new request context for each incoming request
    fn new_ctx(&self) -> Self::CTX {
        RequestContext::default()
    }

    /// No request ever reaches this point: request_filter answers all of them
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        tracing::error!(
            request_id = %ctx.request_id(),
            "Request escaped request_filter; no upstream is configured"
        );
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "No upstream configured",
        ))
    }

    /// Answer the request locally
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();
        ctx.set_request_line(req.method.to_string(), req.uri.path().to_string());

        self.metrics.increment_request_count();
        self.metrics.increment_active_connections();

        let uri = req.uri.to_string();
        let header_size = helpers::total_header_size(req);
        let query = req.uri.query().unwrap_or_default().to_string();

        // Permit is released when _permit is dropped at end of function
        let _permit = match self.admit(ctx, &uri, header_size) {
            Ok(permit) => permit,
            Err(response) => {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    client_ip = %helpers::get_client_ip(session),
                    status = response.status,
                    "Request rejected before routing"
                );
                self.write_response(session, response).await?;
                return Ok(true);
            }
        };

        let response = self.route(ctx, &query);
        self.write_response(session, response).await?;

        Ok(true)
    }

    async fn logging(
        &self,
        session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status_code = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(500);
        let duration_ms = ctx.elapsed_ms();

        self.metrics.increment_status_count(status_code);
        self.metrics.increment_method_count(ctx.method());
        self.metrics.record_duration(duration_ms);
        self.metrics.decrement_active_connections();

        if let Some(error) = e {
            tracing::warn!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                error = %error,
                "Request finished with error"
            );
        }

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            status = status_code,
            duration_ms = duration_ms,
            "Request completed"
        );
    }
}
