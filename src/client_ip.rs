//! Client identity resolution from reverse-proxy headers.
//!
//! The server sits behind a proxy in production, so the peer address is the
//! proxy, not the client. `X-Forwarded-For` (first hop) wins, then
//! `X-Real-Ip`, then the socket peer. When nothing identifies the caller we
//! fall back to a shared sentinel bucket instead of failing the request:
//! throttling degrades, the endpoint keeps working.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Shared bucket for requests with no resolvable client identity.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extractor yielding a stable string identifying the caller, used only as
/// rate-limiter key material.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip());
        Ok(Self(resolve(&parts.headers, peer)))
    }
}

fn resolve(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    if let Some(ip) = header_ip(headers, "x-forwarded-for") {
        return ip.to_string();
    }
    if let Some(ip) = header_ip(headers, "x-real-ip") {
        return ip.to_string();
    }
    peer.map_or_else(|| UNKNOWN_CLIENT.to_string(), |ip| ip.to_string())
}

/// Parses the first address in a (possibly comma-separated) header value.
fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    let value = headers.get(name)?.to_str().ok()?;
    value.split(',').next()?.trim().parse().ok()
}
