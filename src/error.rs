//! Error types for the API layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::validate::FieldError;

/// API error returned by form handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Submission payload failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Client exceeded its quota for this form.
    #[error("too many requests")]
    TooManyRequests { retry_after_secs: u64 },

    /// The mail API rejected the notification or was unreachable.
    #[error("failed to deliver notification")]
    Delivery,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

/// JSON error body: `{ "error": "...", "detail": "...", "retry_after_secs": N }`.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error code (e.g. "bad_request", "too_many_requests").
    pub error: String,
    /// Human-readable error detail, if available.
    pub detail: Option<String>,
    /// Seconds until the quota window resets. Only set on 429 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail, retry_after) = match &self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()), None)
            }
            ApiError::TooManyRequests { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                "too_many_requests",
                Some(format!("retry in {retry_after_secs}s")),
                Some(*retry_after_secs),
            ),
            ApiError::Delivery => (StatusCode::BAD_GATEWAY, "delivery_failed", None, None),
            ApiError::Internal(msg) => {
                tracing::error!(%msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some(msg.clone()),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error.to_string(),
            detail,
            retry_after_secs: retry_after,
        };

        let mut response = (status, axum::Json(body)).into_response();

        // Retry-After header mirrors the body field
        if let Some(secs) = retry_after
            && let Ok(val) = axum::http::HeaderValue::from_str(&secs.to_string())
        {
            response
                .headers_mut()
                .insert(axum::http::header::RETRY_AFTER, val);
        }

        response
    }
}
