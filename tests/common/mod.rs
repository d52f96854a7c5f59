//! Shared utilities for integration tests.

use std::net::SocketAddr;
use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

/// Start a backend that echoes the request line and body.
///
/// The response body is `"<METHOD> <path?query>\n<body>"`; the received
/// `Host` and `X-Forwarded-For` headers come back as `x-echo-host` and
/// `x-echo-forwarded-for`.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(echo);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let host = header_or_empty(&headers, "host");
    let forwarded = header_or_empty(&headers, "x-forwarded-for");
    let status = if uri.path().ends_with("/teapot") {
        StatusCode::IM_A_TEAPOT
    } else {
        StatusCode::OK
    };
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/").to_string();

    (
        status,
        [("x-echo-host", host), ("x-echo-forwarded-for", forwarded)],
        format!("{} {}\n{}", method, target, String::from_utf8_lossy(&body)),
    )
}

fn header_or_empty(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// HTTP client that ignores proxy settings from the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
