//! Request ID middleware: propagates or generates a unique ID per request.

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Ensures every request carries an `X-Request-Id` header.
///
/// An incoming header is preserved; otherwise a UUID v4 is generated. The ID
/// goes back out on the response and onto a tracing span, so a submitter's
/// support ticket can be matched to the log lines for their request.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = incoming_id(&req).unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    if let Ok(val) = HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(X_REQUEST_ID.clone(), val);
    }

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let mut response = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID.clone(), val);
    }

    response
}

fn incoming_id(req: &Request) -> Option<String> {
    let id = req.headers().get(&X_REQUEST_ID)?.to_str().ok()?;
    (!id.is_empty()).then(|| id.to_string())
}
