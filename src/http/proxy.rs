//! Reverse-proxy forwarding.
//!
//! # Responsibilities
//! - Rewrite a request's scheme and authority to a route's origin
//! - Keep path, query, end-to-end headers and body untouched
//! - Relay the upstream response as-is
//! - Map upstream failures to 502 Bad Gateway
//!
//! # Design Decisions
//! - Bodies are streamed in both directions, never buffered
//! - Hop-by-hop headers are connection-scoped and are dropped
//! - No retries, no failover, no caching

use std::net::SocketAddr;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::routing::Origin;

/// Shared upstream client.
pub type HttpClient = Client<HttpConnector, Body>;

/// Headers that only apply to a single connection.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "proxy-connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Error type for request forwarding.
#[derive(Debug, Error)]
pub enum ProxyForwardError {
    /// The outgoing request could not be built.
    #[error("Invalid forwarded request: {0}")]
    Request(#[from] axum::http::Error),

    /// The origin could not be reached or failed mid-request.
    #[error("Upstream request to {origin} failed: {source}")]
    Upstream {
        origin: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

impl IntoResponse for ProxyForwardError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
    }
}

/// Build the upstream client.
pub fn build_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Forward `request` to `origin` and return the origin's response.
pub async fn forward(
    client: &HttpClient,
    origin: &Origin,
    peer: Option<SocketAddr>,
    request: Request<Body>,
) -> Result<Response, ProxyForwardError> {
    let (mut parts, body) = request.into_parts();

    // URI rewrite: origin scheme + authority, original path and query.
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    parts.uri = Uri::builder()
        .scheme(origin.scheme().clone())
        .authority(origin.authority().clone())
        .path_and_query(path_and_query)
        .build()?;
    parts.version = Version::HTTP_11;

    strip_hop_by_hop(&mut parts.headers);
    if let Ok(host) = HeaderValue::from_str(origin.authority().as_str()) {
        parts.headers.insert(header::HOST, host);
    }
    if let Some(peer) = peer {
        append_forwarded_for(&mut parts.headers, peer);
    }

    let upstream = Request::from_parts(parts, body);
    let response = client
        .request(upstream)
        .await
        .map_err(|source| ProxyForwardError::Upstream {
            origin: origin.as_str().to_string(),
            source,
        })?;

    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}

/// Remove hop-by-hop headers, including any named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Append the client IP to `X-Forwarded-For`.
fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let ip = peer.ip().to_string();
    let value = match headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        Some(prior) if !prior.is_empty() => format!("{}, {}", prior, ip),
        _ => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert("x-forwarded-for", value);
    }
}
