//! Prometheus metrics for observability.
//!
//! - HTTP request metrics (latency, counts, in-flight)
//! - Authentication failures
//! - Enrollment decision and notification outcomes
//! - Tickets opened

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "oscar_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("oscar_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "oscar_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("oscar_auth_failures_total", "Total authentication failures"),
        &["reason"],
    )
    .unwrap()
});

/// Enrollment decisions by action and outcome.
pub static ENROLLMENT_DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "oscar_enrollment_decisions_total",
            "Total enrollment decisions",
        ),
        &["action", "outcome"],
    )
    .unwrap()
});

/// Decision notification deliveries by result.
pub static NOTIFY_RESULTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "oscar_notify_results_total",
            "Decision notification deliveries by result",
        ),
        &["result"],
    )
    .unwrap()
});

/// Tickets opened.
pub static TICKETS_OPENED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("oscar_tickets_opened_total", "Total tickets opened").unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(ENROLLMENT_DECISIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(NOTIFY_RESULTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(TICKETS_OPENED_TOTAL.clone()))
        .unwrap();
}

/// Collapse id-bearing path segments so metric cardinality stays bounded.
/// Ids are either all digits (platform snowflakes) or longer digit-bearing
/// tokens (session and pass ids); short version segments like "v1" survive.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let has_digit = segment.chars().any(|c| c.is_ascii_digit());
            let all_digits = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());
            if all_digits || (has_digit && segment.len() >= 6) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Render the registry in the Prometheus text format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
