//! Metrics collection and Prometheus export.
//!
//! Initializes the metrics exporter and provides the /metrics endpoint handler.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the metrics recorder.
///
/// Must be called once at startup before any metrics are recorded; later
/// calls are ignored.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get the current metrics in Prometheus text format.
///
/// Returns a string suitable for the /metrics HTTP endpoint.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Record one run of the analysis pipeline.
pub fn record_analysis(outcome: &'static str, duration: Duration) {
    counter!("analysis_requests_total", "outcome" => outcome).increment(1);
    histogram!("analysis_duration_seconds", "outcome" => outcome).record(duration.as_secs_f64());
}

/// Record one call to the AI provider.
pub fn record_provider_call(provider: &str, success: bool, duration: Duration) {
    let status = if success { "ok" } else { "error" };
    counter!(
        "provider_requests_total",
        "provider" => provider.to_string(),
        "status" => status
    )
    .increment(1);
    histogram!("provider_latency_seconds", "provider" => provider.to_string())
        .record(duration.as_secs_f64());
}
