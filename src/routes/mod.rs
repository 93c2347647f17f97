//! HTTP API routes for Formgate Server.

mod careers;
mod contact;
mod helpers;
mod system;
pub mod types;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorBody;
use crate::request_id::request_id_middleware;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// OpenAPI
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Formgate Server API",
        description = "Form intake API for the Formgate website.\n\nWrite-type endpoints (contact enquiries, job applications) validate input, throttle per client identity, and dispatch a notification mail. Quotas are per form and per client; throttled requests receive a 429 with a Retry-After header.",
        license(name = "Apache-2.0"),
    ),
    paths(
        contact::submit_contact,
        careers::submit_application,
        system::health,
    ),
    components(
        schemas(
            types::ContactRequest, types::ApplicationRequest,
            types::SubmissionResponse, types::HealthResponse, ErrorBody,
        )
    ),
    tags(
        (name = "Forms", description = "Form submission endpoints"),
        (name = "System", description = "System and health endpoints"),
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Builds the main application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/careers/apply", post(careers::submit_application))
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics_endpoint))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&state))
        .with_state(state);

    api.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
}

/// CORS for the website frontend. Empty origin list means no CORS headers at
/// all; the Retry-After and rate-limit headers are exposed so the browser
/// client can render a proper "try again in N seconds" message.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins = state.cors_origins();
    if origins.is_empty() {
        return CorsLayer::new();
    }

    let x_request_id = axum::http::HeaderName::from_static("x-request-id");
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, x_request_id.clone()])
        .expose_headers([
            x_request_id,
            axum::http::HeaderName::from_static("x-ratelimit-remaining"),
            axum::http::HeaderName::from_static("x-ratelimit-reset"),
            axum::http::header::RETRY_AFTER,
        ]);

    match origins {
        [single] if single == "*" => {
            tracing::warn!("CORS wildcard origin — all cross-origin requests allowed");
            base.allow_origin(tower_http::cors::Any)
        }
        _ => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .map(|o| o.parse().expect("invalid CORS origin"))
                .collect();
            base.allow_origin(parsed)
        }
    }
}
