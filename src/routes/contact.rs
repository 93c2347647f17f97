//! Contact form endpoint.

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use crate::client_ip::ClientIp;
use crate::error::{ApiError, ErrorBody};
use crate::metrics::Form;
use crate::state::AppState;

use super::helpers;
use super::types::{ContactRequest, SubmissionResponse};

/// Submit a contact enquiry.
///
/// Admission is checked before validation, so a throttled client learns
/// nothing about payload correctness. The notification is dispatched before
/// the response, so an accepted submission has really left the building.
#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Submission accepted and dispatched", body = SubmissionResponse),
        (status = 400, description = "Payload failed validation", body = ErrorBody),
        (status = 429, description = "Quota exceeded; see Retry-After", body = ErrorBody),
        (status = 502, description = "Mail API unavailable", body = ErrorBody),
    ),
    tag = "Forms"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let decision = helpers::enforce_quota(&state, Form::Contact, &client)?;

    if let Err(err) = req.validate() {
        state.metrics().record_rejected(Form::Contact);
        return Err(err.into());
    }

    helpers::dispatch(&state, Form::Contact, req.to_mail()).await?;

    state.metrics().record_accepted(Form::Contact);
    tracing::info!(%client, remaining = decision.remaining, "contact submission accepted");

    Ok((
        helpers::quota_headers(decision),
        Json(SubmissionResponse::accepted()),
    ))
}
