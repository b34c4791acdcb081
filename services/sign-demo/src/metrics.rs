//! Prometheus metrics exposition
//!
//! - `sign_demo_requests_total` (counter): labels `route`, `status`
//! - `sign_demo_request_duration_seconds` (histogram): label `route`
//! - `sign_api_errors_total` (counter): label `kind`

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

const DURATION_METRIC: &str = "sign_demo_request_duration_seconds";

/// Bucket boundaries from 5ms to 60s. Demo routes chain up to four Adobe
/// Sign calls, each bounded by the client timeout.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

fn builder() -> PrometheusBuilder {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(DURATION_METRIC.to_string()), DURATION_BUCKETS)
        .expect("histogram buckets are non-empty")
}

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_recorder() -> PrometheusHandle {
    builder()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Record a completed demo request.
pub fn record_request(route: &str, status: u16, duration_secs: f64) {
    metrics::counter!("sign_demo_requests_total", "route" => route.to_string(), "status" => status.to_string())
        .increment(1);
    metrics::histogram!(DURATION_METRIC, "route" => route.to_string()).record(duration_secs);
}

/// Record a failed Adobe Sign call by error kind.
pub fn record_sign_api_error(kind: &'static str) {
    metrics::counter!("sign_api_errors_total", "kind" => kind).increment(1);
}

/// Route-layer middleware timing each matched request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let started = Instant::now();

    let response = next.run(request).await;
    record_request(
        &route,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
