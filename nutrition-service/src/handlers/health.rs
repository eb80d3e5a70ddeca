use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "nutrition-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the AI provider must be reachable and configured.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .analyzer
        .provider()
        .health_check()
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Provider health check failed");
            AppError::ServiceUnavailable
        })?;

    Ok(StatusCode::OK)
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        get_metrics(),
    )
}
