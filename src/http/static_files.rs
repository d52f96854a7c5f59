//! Static content serving.
//!
//! A directory is served at `/`. When the directory holds an `index.html`
//! at build time, every request that matches no file is answered with it
//! (single-page-app fallback). The check happens once; an index created
//! later is not picked up.
//!
//! Routers here carry no tracing layer: whoever serves them on a socket
//! adds one, so a request nested in the front end is traced once.

use std::path::Path;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Router serving `dir`, with the index fallback when available.
pub fn static_router(dir: &str) -> Router {
    let index = Path::new(dir).join("index.html");

    if index.is_file() {
        tracing::debug!(dir = %dir, index = %index.display(), "Serving static content with index fallback");
        let serve_dir = ServeDir::new(dir)
            .call_fallback_on_method_not_allowed(true)
            .fallback(ServeFile::new(index));
        Router::new().fallback_service(serve_dir)
    } else {
        tracing::debug!(dir = %dir, "Serving static content");
        Router::new().fallback_service(ServeDir::new(dir))
    }
}

/// Router for a listener that has nothing to serve: everything is 404.
pub fn empty_router() -> Router {
    Router::new()
}
