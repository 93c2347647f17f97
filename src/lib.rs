//! Formgate Server - form intake backend for the Formgate website.
//!
//! The website itself is static; this service owns the write path. Contact
//! enquiries and job applications arrive as JSON, get throttled per client
//! identity by an in-memory fixed-window rate limiter, validated, and
//! forwarded as notification mail through an HTTP mail API.
//!
//! Counters are process-local by design: a restart resets all quotas, and a
//! multi-instance deployment would need a shared store behind the same
//! `check` contract. Single-process is the deployment assumption here.

pub mod client_ip;
pub mod config;
pub mod error;
pub mod mailer;
pub mod metrics;
pub mod rate_limit;
pub mod request_id;
pub mod routes;
pub mod state;
pub mod validate;

pub use routes::router;
pub use state::AppState;
