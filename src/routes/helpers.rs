//! Shared helpers for the form handlers.

use axum::http::HeaderName;

use crate::error::ApiError;
use crate::mailer::OutboundMail;
use crate::metrics::Form;
use crate::rate_limit::Decision;
use crate::state::AppState;

/// Consults the rate limiter exactly once for this request.
///
/// The key is `"<form>:<client>"`, so the same client gets an independent
/// quota per form and abusing one endpoint does not lock out the other.
pub fn enforce_quota(state: &AppState, form: Form, client: &str) -> Result<Decision, ApiError> {
    let key = format!("{}:{}", form.as_str(), client);
    let decision = state.rate_limiter().check(&key, state.quotas().get(form));

    if decision.allowed {
        return Ok(decision);
    }

    state.metrics().record_throttled(form);
    tracing::warn!(
        client,
        form = form.as_str(),
        retry_after_secs = decision.retry_after_secs,
        "submission throttled"
    );
    Err(ApiError::TooManyRequests {
        retry_after_secs: decision.retry_after_secs,
    })
}

/// Hands the notification to the mailer; maps failures to a 502.
pub async fn dispatch(state: &AppState, form: Form, mail: OutboundMail) -> Result<(), ApiError> {
    if let Err(err) = state.mailer().send(mail).await {
        state.metrics().record_delivery_failure(form);
        tracing::error!(form = form.as_str(), error = %err, "notification delivery failed");
        return Err(ApiError::Delivery);
    }
    Ok(())
}

/// Rate-limit response headers for an admitted request.
pub fn quota_headers(decision: Decision) -> [(HeaderName, String); 2] {
    [
        (
            HeaderName::from_static("x-ratelimit-remaining"),
            decision.remaining.to_string(),
        ),
        (
            HeaderName::from_static("x-ratelimit-reset"),
            decision.retry_after_secs.to_string(),
        ),
    ]
}
