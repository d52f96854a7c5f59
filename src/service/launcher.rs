//! Listener launching for resolved descriptors.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::ServiceDescriptor;
use crate::http::{empty_router, static_router};
use crate::net::listener::{self, origin_url, spawn_serve};
use crate::net::{ListenerBindError, ListenerHandle};

/// Router serving a descriptor's own content.
pub fn content_router(descriptor: &ServiceDescriptor) -> Router {
    if descriptor.static_dir.is_empty() {
        empty_router()
    } else {
        static_router(&descriptor.static_dir)
    }
}

/// Launch the listener for `descriptor` unless it already has a URL.
///
/// On success the descriptor's `url` is the origin of the new listener and
/// `bind_port` the port actually bound. Descriptors with a URL are left
/// untouched and `Ok(None)` is returned.
pub async fn launch(descriptor: &mut ServiceDescriptor) -> Result<Option<ListenerHandle>, ListenerBindError> {
    if descriptor.is_external() {
        tracing::debug!(service = %descriptor.label(), url = %descriptor.url, "Service already running, no listener launched");
        return Ok(None);
    }

    let router = content_router(descriptor).layer(TraceLayer::new_for_http());
    launch_with_router(descriptor, router).await.map(Some)
}

/// Bind `descriptor`'s address and serve `router` on it in the background.
pub async fn launch_with_router(
    descriptor: &mut ServiceDescriptor,
    router: Router,
) -> Result<ListenerHandle, ListenerBindError> {
    let bound = listener::bind(&descriptor.bind_address, descriptor.bind_port).await?;
    let handle = spawn_serve(descriptor.label(), bound, router)?;

    descriptor.bind_port = handle.local_addr().port();
    descriptor.url = origin_url(handle.local_addr());

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn external_service_is_not_launched() {
        let mut descriptor = ServiceDescriptor {
            url: "http://10.0.0.5:3000".into(),
            bind_address: "127.0.0.1".into(),
            bind_port: 1,
            ..Default::default()
        };
        let before = descriptor.clone();

        assert!(launch(&mut descriptor).await.unwrap().is_none());
        assert_eq!(descriptor, before);
    }

    #[tokio::test]
    async fn launch_sets_origin_url() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "hello").unwrap();

        let mut descriptor = ServiceDescriptor {
            static_dir: dir.path().to_str().unwrap().into(),
            bind_address: "127.0.0.1".into(),
            bind_port: 0,
            ..Default::default()
        };

        let handle = launch(&mut descriptor).await.unwrap().unwrap();
        assert_ne!(descriptor.bind_port, 0);
        assert_eq!(descriptor.url, format!("http://127.0.0.1:{}", descriptor.bind_port));

        let body = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap()
            .get(format!("{}/anything", descriptor.url))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "hello");

        handle.abort().await;
    }

    #[tokio::test]
    async fn second_launch_on_same_port_fails() {
        let mut first = ServiceDescriptor {
            bind_address: "127.0.0.1".into(),
            ..Default::default()
        };
        let handle = launch(&mut first).await.unwrap().unwrap();

        let mut second = ServiceDescriptor {
            bind_address: "127.0.0.1".into(),
            bind_port: first.bind_port,
            ..Default::default()
        };
        let err = launch(&mut second).await.unwrap_err();
        assert!(matches!(err, ListenerBindError::Bind { .. }));
        assert!(second.url.is_empty());
        assert!(!handle.is_finished());
    }
}
