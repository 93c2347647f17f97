//! System and health endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::state::AppState;

use super::types::HealthResponse;

/// Check server health.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    ),
    tag = "System"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
        mail_configured: state.mailer().is_configured(),
    })
}

/// Prometheus-compatible metrics endpoint.
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics()
        .render(state.uptime_secs(), state.rate_limiter().tracked_keys());

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}
