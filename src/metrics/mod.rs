// Metrics module - Prometheus-compatible metrics tracking
// Provides counters, gauges and a latency summary for observability

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Number of most recent request durations kept for percentile estimation
const MAX_DURATION_SAMPLES: usize = 10_000;

/// Histogram represents percentile statistics for latency measurements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Histogram {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Metrics struct tracks counters and histograms for Prometheus export
/// Thread-safe via atomic operations and mutexes
pub struct Metrics {
    // Request counters
    request_count: AtomicU64,

    // Status code counters (e.g., 200, 400, 500)
    status_counts: Mutex<HashMap<u16, u64>>,

    // HTTP method counters (GET, POST, etc.)
    method_counts: Mutex<HashMap<String, u64>>,

    // Duration tracking (stored in microseconds, bounded ring)
    durations: Mutex<VecDeque<u64>>,

    // Signing outcomes
    urls_issued: AtomicU64,
    issue_errors: Mutex<HashMap<String, u64>>,

    // In-flight requests
    active_connections: AtomicU64,

    // Rejections before the handler runs
    concurrency_limit_rejections: AtomicU64,
    security_uri_too_long: AtomicU64,
    security_headers_too_large: AtomicU64,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Metrics {
            request_count: AtomicU64::new(0),
            status_counts: Mutex::new(HashMap::new()),
            method_counts: Mutex::new(HashMap::new()),
            durations: Mutex::new(VecDeque::new()),
            urls_issued: AtomicU64::new(0),
            issue_errors: Mutex::new(HashMap::new()),
            active_connections: AtomicU64::new(0),
            concurrency_limit_rejections: AtomicU64::new(0),
            security_uri_too_long: AtomicU64::new(0),
            security_headers_too_large: AtomicU64::new(0),
        }
    }

    /// Increment the total request count
    pub fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment counter for a specific HTTP status code
    pub fn increment_status_count(&self, status_code: u16) {
        if let Ok(mut counts) = self.status_counts.lock() {
            *counts.entry(status_code).or_insert(0) += 1;
        }
    }

    /// Increment counter for a specific HTTP method
    pub fn increment_method_count(&self, method: &str) {
        if let Ok(mut counts) = self.method_counts.lock() {
            *counts.entry(method.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a request duration in milliseconds
    pub fn record_duration(&self, duration_ms: f64) {
        let duration_us = (duration_ms * 1000.0) as u64;
        if let Ok(mut durations) = self.durations.lock() {
            if durations.len() == MAX_DURATION_SAMPLES {
                durations.pop_front();
            }
            durations.push_back(duration_us);
        }
    }

    pub fn increment_urls_issued(&self) {
        self.urls_issued.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment counter for a failed issue request, keyed by error kind
    pub fn increment_issue_error(&self, kind: &str) {
        if let Ok(mut errors) = self.issue_errors.lock() {
            *errors.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    pub fn increment_active_connections(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        // Saturate at zero rather than wrap
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_sub(1))
            });
    }

    pub fn increment_concurrency_limit_rejection(&self) {
        self.concurrency_limit_rejections
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_security_uri_too_long(&self) {
        self.security_uri_too_long.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_security_headers_too_large(&self) {
        self.security_headers_too_large
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn get_status_count(&self, status_code: u16) -> u64 {
        self.status_counts
            .lock()
            .ok()
            .and_then(|counts| counts.get(&status_code).copied())
            .unwrap_or(0)
    }

    pub fn get_method_count(&self, method: &str) -> u64 {
        self.method_counts
            .lock()
            .ok()
            .and_then(|counts| counts.get(method).copied())
            .unwrap_or(0)
    }

    pub fn get_urls_issued(&self) -> u64 {
        self.urls_issued.load(Ordering::Relaxed)
    }

    pub fn get_issue_error_count(&self, kind: &str) -> u64 {
        self.issue_errors
            .lock()
            .ok()
            .and_then(|errors| errors.get(kind).copied())
            .unwrap_or(0)
    }

    pub fn get_active_connections(&self) -> u64 {
        self.active_connections.load(Ordering::Relaxed)
    }

    pub fn get_concurrency_limit_rejections(&self) -> u64 {
        self.concurrency_limit_rejections.load(Ordering::Relaxed)
    }

    /// Calculate histogram from duration samples
    pub fn get_duration_histogram(&self) -> Histogram {
        if let Ok(durations) = self.durations.lock() {
            let samples: Vec<u64> = durations.iter().copied().collect();
            calculate_histogram(&samples)
        } else {
            calculate_histogram(&[])
        }
    }

    /// Render all metrics in Prometheus text exposition format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP http_requests_total Total number of HTTP requests received\n");
        output.push_str("# TYPE http_requests_total counter\n");
        output.push_str(&format!(
            "http_requests_total {}\n",
            self.request_count.load(Ordering::Relaxed)
        ));

        output.push_str("\n# HELP http_requests_by_status_total HTTP requests by status code\n");
        output.push_str("# TYPE http_requests_by_status_total counter\n");
        if let Ok(counts) = self.status_counts.lock() {
            let mut sorted: Vec<_> = counts.iter().collect();
            sorted.sort();
            for (status, count) in sorted {
                output.push_str(&format!(
                    "http_requests_by_status_total{{status=\"{}\"}} {}\n",
                    status, count
                ));
            }
        }

        output.push_str("\n# HELP http_requests_by_method_total HTTP requests by method\n");
        output.push_str("# TYPE http_requests_by_method_total counter\n");
        if let Ok(counts) = self.method_counts.lock() {
            let mut sorted: Vec<_> = counts.iter().collect();
            sorted.sort();
            for (method, count) in sorted {
                output.push_str(&format!(
                    "http_requests_by_method_total{{method=\"{}\"}} {}\n",
                    method, count
                ));
            }
        }

        output.push_str("\n# HELP signed_urls_issued_total Signed URLs successfully issued\n");
        output.push_str("# TYPE signed_urls_issued_total counter\n");
        output.push_str(&format!(
            "signed_urls_issued_total {}\n",
            self.urls_issued.load(Ordering::Relaxed)
        ));

        output.push_str("\n# HELP signed_url_errors_total Failed issue requests by error kind\n");
        output.push_str("# TYPE signed_url_errors_total counter\n");
        if let Ok(errors) = self.issue_errors.lock() {
            let mut sorted: Vec<_> = errors.iter().collect();
            sorted.sort();
            for (kind, count) in sorted {
                output.push_str(&format!(
                    "signed_url_errors_total{{kind=\"{}\"}} {}\n",
                    kind, count
                ));
            }
        }

        output.push_str("\n# HELP active_connections Requests currently in flight\n");
        output.push_str("# TYPE active_connections gauge\n");
        output.push_str(&format!(
            "active_connections {}\n",
            self.active_connections.load(Ordering::Relaxed)
        ));

        output.push_str(
            "\n# HELP http_requests_rejected_total Requests rejected before reaching a handler\n",
        );
        output.push_str("# TYPE http_requests_rejected_total counter\n");
        output.push_str(&format!(
            "http_requests_rejected_total{{reason=\"concurrency_limit\"}} {}\n",
            self.concurrency_limit_rejections.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "http_requests_rejected_total{{reason=\"uri_too_long\"}} {}\n",
            self.security_uri_too_long.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "http_requests_rejected_total{{reason=\"headers_too_large\"}} {}\n",
            self.security_headers_too_large.load(Ordering::Relaxed)
        ));

        let histogram = self.get_duration_histogram();
        output.push_str("\n# HELP http_request_duration_seconds Request duration in seconds\n");
        output.push_str("# TYPE http_request_duration_seconds summary\n");
        for (quantile, value_ms) in [
            ("0.5", histogram.p50),
            ("0.9", histogram.p90),
            ("0.95", histogram.p95),
            ("0.99", histogram.p99),
        ] {
            output.push_str(&format!(
                "http_request_duration_seconds{{quantile=\"{}\"}} {:.6}\n",
                quantile,
                value_ms / 1000.0
            ));
        }

        output
    }
}

fn calculate_histogram(samples: &[u64]) -> Histogram {
    if samples.is_empty() {
        return Histogram {
            p50: 0.0,
            p90: 0.0,
            p95: 0.0,
            p99: 0.0,
        };
    }

    let mut sorted: Vec<u64> = samples.to_vec();
    sorted.sort_unstable();

    let percentile = |p: f64| {
        let idx = (sorted.len() as f64 * p) as usize;
        // Convert from microseconds to milliseconds
        sorted.get(idx.saturating_sub(1)).copied().unwrap_or(0) as f64 / 1000.0
    };

    Histogram {
        p50: percentile(0.50),
        p90: percentile(0.90),
        p95: percentile(0.95),
        p99: percentile(0.99),
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
