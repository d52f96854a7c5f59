//! TCP listener binding and background serving.
//!
//! # Responsibilities
//! - Bind to a configured address/port, reporting failures
//! - Derive the connectable origin URL of a bound socket
//! - Run an Axum router on the socket as a background task
//! - Hand the task back as an owned handle

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Error type for listener binding.
#[derive(Debug, Error)]
pub enum ListenerBindError {
    /// Address is missing or could not be used.
    #[error("Invalid bind address {address:?}")]
    InvalidAddress { address: String },

    /// The OS refused the bind (port in use, permission, unknown host).
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind a TCP listener on `address:port`.
///
/// `address` may be an IP literal or a host name.
pub async fn bind(address: &str, port: u16) -> Result<TcpListener, ListenerBindError> {
    if address.is_empty() {
        return Err(ListenerBindError::InvalidAddress { address: address.to_string() });
    }

    let listener = TcpListener::bind((address, port))
        .await
        .map_err(|source| ListenerBindError::Bind {
            address: format!("{}:{}", address, port),
            source,
        })?;

    if let Ok(local_addr) = listener.local_addr() {
        tracing::debug!(address = %local_addr, "Listener bound");
    }

    Ok(listener)
}

/// The `http://host:port` origin clients use to reach a bound socket.
///
/// Wildcard addresses are not connectable everywhere, so they map to the
/// loopback address of the same family.
pub fn origin_url(addr: SocketAddr) -> String {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(ip, addr.port()))
}

/// The origin a listener on `address:port` would have had.
///
/// Used for services whose bind failed, where no socket exists to ask.
pub fn intended_origin(address: &str, port: u16) -> String {
    match address.parse::<IpAddr>() {
        Ok(ip) => origin_url(SocketAddr::new(ip, port)),
        Err(_) => format!("http://{}:{}", address, port),
    }
}

/// Owned handle to a listener running in the background.
#[derive(Debug)]
pub struct ListenerHandle {
    name: String,
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    /// Service name this listener belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the serve task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop accepting connections and wait for the task to end.
    pub async fn abort(self) {
        self.task.abort();
        let _ = self.task.await;
        tracing::debug!(service = %self.name, address = %self.local_addr, "Listener stopped");
    }
}

/// Serve `router` on `listener` in a background task.
///
/// Returns once the task is spawned; there is no readiness signal beyond
/// the socket already being bound.
pub fn spawn_serve(name: &str, listener: TcpListener, router: Router) -> Result<ListenerHandle, ListenerBindError> {
    let local_addr = listener.local_addr().map_err(|source| ListenerBindError::Bind {
        address: name.to_string(),
        source,
    })?;

    let service_name = name.to_string();
    let task = tokio::spawn(async move {
        let app = router.into_make_service_with_connect_info::<SocketAddr>();
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(service = %service_name, address = %local_addr, error = %e, "Listener stopped with error");
        }
    });

    tracing::info!(service = %name, address = %local_addr, "Listening for connections");

    Ok(ListenerHandle {
        name: name.to_string(),
        local_addr,
        task,
    })
}
