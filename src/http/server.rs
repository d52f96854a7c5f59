//! Front-end HTTP server.
//!
//! # Responsibilities
//! - Build the Axum router of the public listener
//! - Dispatch every request: installed route → proxy, otherwise root content
//! - Answer 502 for routes whose backend never started
//! - Read the route table lock-free on each request

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use arc_swap::ArcSwap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use crate::http::proxy::{self, HttpClient};
use crate::routing::RouteTable;

/// Application state injected into the front-end handler.
#[derive(Clone)]
pub struct FrontEndState {
    /// Installed routes; replaced wholesale by the gateway.
    pub routes: Arc<ArcSwap<RouteTable>>,
    pub client: HttpClient,
    /// Content served for unrouted paths.
    pub root: Option<Router>,
}

/// Build the front-end router.
pub fn front_end_router(state: FrontEndState) -> Router {
    Router::new()
        .route("/{*path}", any(gateway_handler))
        .route("/", any(gateway_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Main dispatch handler.
/// Looks up a route and forwards, or hands the request to the root content.
async fn gateway_handler(
    State(state): State<FrontEndState>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();
    let target = state
        .routes
        .load()
        .match_path(&path)
        .map(|route| (route.name.clone(), route.origin.clone(), route.available));

    if let Some((name, origin, available)) = target {
        if !available {
            tracing::debug!(service = %name, path = %path, "Service unavailable");
            return (StatusCode::BAD_GATEWAY, "Service unavailable").into_response();
        }

        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);

        tracing::debug!(
            service = %name,
            method = %request.method(),
            path = %path,
            origin = %origin.as_str(),
            "Proxying request"
        );

        return match proxy::forward(&state.client, &origin, peer, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(service = %name, path = %path, error = %e, "Upstream error");
                e.into_response()
            }
        };
    }

    match state.root {
        Some(root) => root
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {}),
        None => (StatusCode::NOT_FOUND, "No matching route found").into_response(),
    }
}
