//! Job application endpoint.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::client_ip::ClientIp;
use crate::error::{ApiError, ErrorBody};
use crate::metrics::Form;
use crate::state::AppState;

use super::helpers;
use super::types::{ApplicationRequest, SubmissionResponse};

/// Submit a job application.
///
/// Applications get a much longer window than contact enquiries (default 3
/// per hour): nobody applies to the same consultancy five times a minute,
/// but recruiters' scrapers try.
#[utoipa::path(
    post,
    path = "/api/careers/apply",
    request_body = ApplicationRequest,
    responses(
        (status = 200, description = "Application accepted and dispatched", body = SubmissionResponse),
        (status = 400, description = "Payload failed validation", body = ErrorBody),
        (status = 429, description = "Quota exceeded; see Retry-After", body = ErrorBody),
        (status = 502, description = "Mail API unavailable", body = ErrorBody),
    ),
    tag = "Forms"
)]
pub async fn submit_application(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    Json(req): Json<ApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let decision = helpers::enforce_quota(&state, Form::Careers, &client)?;

    if let Err(err) = req.validate() {
        state.metrics().record_rejected(Form::Careers);
        return Err(err.into());
    }

    helpers::dispatch(&state, Form::Careers, req.to_mail()).await?;

    state.metrics().record_accepted(Form::Careers);
    tracing::info!(
        %client,
        position = %req.position.trim(),
        remaining = decision.remaining,
        "application accepted"
    );

    Ok((
        helpers::quota_headers(decision),
        Json(SubmissionResponse::accepted()),
    ))
}
