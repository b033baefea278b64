//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "liveportrait_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "liveportrait_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "liveportrait_http_requests_in_flight";

    // Generation metrics
    pub const GENERATIONS_TOTAL: &str = "liveportrait_generations_total";
    pub const GENERATION_DURATION_SECONDS: &str = "liveportrait_generation_duration_seconds";
    pub const UPSTREAM_DURATION_SECONDS: &str = "liveportrait_upstream_duration_seconds";
    pub const RESULT_BYTES: &str = "liveportrait_result_bytes";
}

/// Routes reported under their own path label.
const KNOWN_PATHS: &[&str] = &["/api/generate", "/health", "/healthz", "/ready", "/metrics"];

static ASSET_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/[A-Za-z0-9_.-]+)+\.[A-Za-z0-9]{2,5}$").expect("valid asset path regex")
});

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished generate request.
pub fn record_generation(outcome: &str, duration_secs: f64) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::GENERATIONS_TOTAL, &labels).increment(1);
    histogram!(names::GENERATION_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record time spent waiting on the inference service.
pub fn record_upstream_duration(duration_secs: f64) {
    histogram!(names::UPSTREAM_DURATION_SECONDS).record(duration_secs);
}

/// Record the size of a generated video.
pub fn record_result_size(bytes: usize) {
    histogram!(names::RESULT_BYTES).record(bytes as f64);
}

/// Collapse paths to a bounded label set (static assets share one label).
fn sanitize_path(path: &str) -> String {
    if KNOWN_PATHS.contains(&path) {
        return path.to_string();
    }
    if ASSET_PATH.is_match(path) {
        "/:asset".to_string()
    } else {
        "/:other".to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
