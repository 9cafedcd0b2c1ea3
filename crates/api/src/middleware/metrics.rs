//! Prometheus metrics: HTTP instrumentation, business counters, exporter.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Records `http_requests_total` and `http_request_duration_seconds` for
/// every request, labeled by method and matched route (not the raw path,
/// which would blow up cardinality on IDs).
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// Record a maintenance request created through the API.
pub fn record_request_created(request_type: &str) {
    counter!(
        "maintenance_requests_created_total",
        "request_type" => request_type.to_string()
    )
    .increment(1);
}

/// Record a workflow transition (allocation, response, stage move, ...).
pub fn record_workflow_transition(transition: &'static str) {
    counter!("workflow_transitions_total", "transition" => transition).increment(1);
}

/// Record the outcome of a workflow notification delivery attempt.
pub fn record_notification_outcome(outcome: &'static str) {
    counter!("workflow_notifications_total", "outcome" => outcome).increment(1);
}

/// Handler for the /metrics endpoint, Prometheus text exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Installs the global Prometheus recorder. Call once at startup, before
/// the first metric is recorded.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0])
        .expect("Failed to set histogram buckets")
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        panic!("Prometheus recorder already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these are no-ops; the point is that
    // the label shapes are accepted.
    #[test]
    fn test_business_counters_accept_labels() {
        record_request_created("corrective");
        record_workflow_transition("allocated");
        record_notification_outcome("sent");
    }

    #[tokio::test]
    async fn test_metrics_handler_before_init_reports_error() {
        let response = metrics_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
