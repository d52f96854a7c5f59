//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the front-end listener (fatal on failure)
//! - Resolve, launch and route each configured service in order
//! - Record per-service failures and keep going
//! - Own the route table, the listener handles and the config store
//!
//! # Design Decisions
//! - The front end starts first; routes are published into its table as
//!   each service is set up
//! - Setup is sequential; a route is installed right after its listener's
//!   socket is bound, before the listener is necessarily serving
//! - One broken service never prevents the others from starting
//! - A service whose listener failed keeps its prefix: the front end answers
//!   502 there rather than serving root content in its place

use std::net::SocketAddr;
use std::sync::Arc;
use arc_swap::ArcSwap;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::{ConfigStore, GatewayConfig, ServiceDescriptor};
use crate::http::proxy::build_client;
use crate::http::{front_end_router, FrontEndState};
use crate::lifecycle::reload::apply_reload;
use crate::net::listener::intended_origin;
use crate::observability::logging::LogFilter;
use crate::net::{ListenerBindError, ListenerHandle};
use crate::routing::{is_trivial_prefix, RouteInstallError, RouteTable};
use crate::service::{content_router, launch, launch_with_router, resolve};

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Front-end listener failed: {0}")]
    FrontEnd(#[from] ListenerBindError),
}

/// Why a single service could not be set up.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Bind(#[from] ListenerBindError),

    #[error(transparent)]
    Route(#[from] RouteInstallError),
}

/// A service that failed during setup.
#[derive(Debug)]
pub struct ServiceFailure {
    pub name: String,
    pub error: ServiceError,
}

/// Result of a route installation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// Empty or root prefix; the front end serves it itself.
    Skipped,
}

/// The running gateway.
pub struct Gateway {
    config: Arc<ConfigStore>,
    routes: Arc<ArcSwap<RouteTable>>,
    front_end: ListenerHandle,
    listeners: Vec<ListenerHandle>,
    services: Vec<ServiceDescriptor>,
    failures: Vec<ServiceFailure>,
    log_filter: Option<LogFilter>,
}

impl Gateway {
    /// Start the front end and every configured service.
    pub async fn start(config: GatewayConfig) -> Result<Self, GatewayError> {
        Self::start_with_store(Arc::new(ConfigStore::new(config))).await
    }

    /// Like [`Gateway::start`], reading the configuration from `store`.
    pub async fn start_with_store(store: Arc<ConfigStore>) -> Result<Self, GatewayError> {
        let snapshot = store.current();
        let config = &snapshot.config;

        let routes = Arc::new(ArcSwap::from_pointee(RouteTable::new()));
        let mut root = config.root_descriptor();
        let state = FrontEndState {
            routes: Arc::clone(&routes),
            client: build_client(),
            root: (!root.static_dir.is_empty()).then(|| content_router(&root)),
        };
        let front_end = launch_with_router(&mut root, front_end_router(state)).await?;

        let mut gateway = Self {
            config: Arc::clone(&store),
            routes,
            front_end,
            listeners: Vec::new(),
            services: Vec::with_capacity(config.services.len()),
            failures: Vec::new(),
            log_filter: None,
        };

        for descriptor in config.services.iter().cloned() {
            gateway.setup_service(descriptor).await;
        }

        tracing::info!(
            address = %gateway.front_end_addr(),
            config_version = snapshot.version,
            services = gateway.services.len(),
            routes = gateway.routes.load().len(),
            failures = gateway.failures.len(),
            "Gateway started"
        );

        Ok(gateway)
    }

    /// Resolve → launch if needed → install route, recording any failure.
    async fn setup_service(&mut self, descriptor: ServiceDescriptor) {
        let mut resolved = resolve(descriptor);
        let name = resolved.label().to_string();

        match launch(&mut resolved).await {
            Ok(Some(handle)) => self.listeners.push(handle),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(service = %name, error = %e, "Service listener failed to start");
                resolved.url = intended_origin(&resolved.bind_address, resolved.bind_port);
                self.install_unavailable_route(&name, &resolved.route_prefix, &resolved.url);
                self.failures.push(ServiceFailure { name, error: e.into() });
                self.services.push(resolved);
                return;
            }
        }

        match self.install_route(&name, &resolved.route_prefix, &resolved.url) {
            Ok(InstallOutcome::Installed) => {
                tracing::info!(service = %name, prefix = %resolved.route_prefix, origin = %resolved.url, "Route installed");
            }
            Ok(InstallOutcome::Skipped) => {
                tracing::debug!(service = %name, url = %resolved.url, "No route for empty or root prefix");
            }
            Err(e) => {
                tracing::error!(service = %name, error = %e, "Route not installed");
                self.failures.push(ServiceFailure { name, error: e.into() });
            }
        }

        self.services.push(resolved);
    }

    /// Install a forwarding route on the front end.
    ///
    /// Every HTTP method under `prefix` is forwarded to `origin`.
    pub fn install_route(&self, name: &str, prefix: &str, origin: &str) -> Result<InstallOutcome, RouteInstallError> {
        if is_trivial_prefix(prefix) {
            return Ok(InstallOutcome::Skipped);
        }

        let mut table = RouteTable::clone(&self.routes.load());
        table.install(name, prefix, origin)?;
        self.routes.store(Arc::new(table));
        Ok(InstallOutcome::Installed)
    }

    /// Claim `prefix` for a service that never started, so requests there
    /// get 502 instead of root content.
    fn install_unavailable_route(&self, name: &str, prefix: &str, origin: &str) {
        if is_trivial_prefix(prefix) {
            return;
        }

        let mut table = RouteTable::clone(&self.routes.load());
        match table.install_unavailable(name, prefix, origin) {
            Ok(_) => {
                self.routes.store(Arc::new(table));
                tracing::warn!(service = %name, prefix = %prefix, "Route installed for unavailable service");
            }
            Err(e) => tracing::error!(service = %name, error = %e, "Route for unavailable service not installed"),
        }
    }

    /// Let reloads change the log verbosity through `filter`.
    pub fn with_log_filter(mut self, filter: LogFilter) -> Self {
        self.log_filter = Some(filter);
        self
    }

    /// Apply configuration updates until the channel closes, then keep the
    /// listeners alive until the process is terminated.
    pub async fn run(self, mut updates: mpsc::UnboundedReceiver<GatewayConfig>) {
        while let Some(config) = updates.recv().await {
            apply_reload(&self.config, config, self.log_filter.as_ref());
        }
        tracing::debug!("Config update channel closed");
        std::future::pending::<()>().await;
    }

    /// Address the front end is bound to.
    pub fn front_end_addr(&self) -> SocketAddr {
        self.front_end.local_addr()
    }

    /// Configuration store shared with the reload path.
    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    /// Resolved descriptors, in configuration order.
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Services that failed during setup.
    pub fn failures(&self) -> &[ServiceFailure] {
        &self.failures
    }

    /// Snapshot of the installed routes.
    pub fn routes(&self) -> Arc<RouteTable> {
        self.routes.load_full()
    }

    /// Backend listeners launched by the gateway.
    pub fn listeners(&self) -> &[ListenerHandle] {
        &self.listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> GatewayConfig {
        GatewayConfig {
            bind_address: "127.0.0.1".into(),
            bind_port: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn trivial_prefixes_are_skipped() {
        let gateway = Gateway::start(local_config()).await.unwrap();

        assert_eq!(gateway.install_route("root", "/", "http://127.0.0.1:1").unwrap(), InstallOutcome::Skipped);
        assert_eq!(gateway.install_route("none", "", "http://127.0.0.1:1").unwrap(), InstallOutcome::Skipped);
        assert!(gateway.routes().is_empty());
    }

    #[tokio::test]
    async fn external_service_gets_route_but_no_listener() {
        let mut config = local_config();
        config.services.push(ServiceDescriptor {
            name: "api".into(),
            url: "http://10.0.0.5:3000".into(),
            route_prefix: "/api".into(),
            ..Default::default()
        });

        let gateway = Gateway::start(config).await.unwrap();

        assert!(gateway.listeners().is_empty());
        assert!(gateway.failures().is_empty());
        let routes = gateway.routes();
        let route = routes.match_path("/api/orders").unwrap();
        assert_eq!(route.origin.as_str(), "http://10.0.0.5:3000");
        assert_eq!(gateway.services()[0].url, "http://10.0.0.5:3000");
    }

    #[tokio::test]
    async fn failures_do_not_stop_later_services() {
        let mut config = local_config();
        config.services.push(ServiceDescriptor {
            name: "broken".into(),
            url: "not-a-url".into(),
            route_prefix: "/broken".into(),
            ..Default::default()
        });
        config.services.push(ServiceDescriptor {
            name: "dup".into(),
            url: "http://127.0.0.1:1".into(),
            route_prefix: "/ok".into(),
            ..Default::default()
        });
        config.services.push(ServiceDescriptor {
            name: "dup-again".into(),
            url: "http://127.0.0.1:2".into(),
            route_prefix: "/ok".into(),
            ..Default::default()
        });
        config.services.push(ServiceDescriptor {
            name: "local".into(),
            route_prefix: "/local".into(),
            ..Default::default()
        });

        let gateway = Gateway::start(config).await.unwrap();

        let failed: Vec<&str> = gateway.failures().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, ["broken", "dup-again"]);
        assert!(matches!(gateway.failures()[1].error, ServiceError::Route(RouteInstallError::Conflict { .. })));

        let routes = gateway.routes();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes.match_path("/ok").unwrap().name, "dup");
        assert_eq!(routes.match_path("/local/x").unwrap().name, "local");
        assert_eq!(gateway.listeners().len(), 1);
        assert_eq!(gateway.services().len(), 4);
    }

    #[tokio::test]
    async fn failed_listener_keeps_its_prefix() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let mut config = local_config();
        config.services.push(ServiceDescriptor {
            name: "late".into(),
            route_prefix: "/late".into(),
            bind_port: port,
            ..Default::default()
        });

        let gateway = Gateway::start(config).await.unwrap();

        assert_eq!(gateway.failures().len(), 1);
        assert!(matches!(gateway.failures()[0].error, ServiceError::Bind(_)));
        assert_eq!(gateway.services()[0].url, format!("http://127.0.0.1:{}", port));

        let routes = gateway.routes();
        let route = routes.match_path("/late/x").unwrap();
        assert_eq!(route.name, "late");
        assert!(!route.available);
        assert!(gateway.listeners().is_empty());
    }

    #[tokio::test]
    async fn front_end_bind_failure_is_fatal() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = local_config();
        config.bind_port = taken.local_addr().unwrap().port();

        let err = Gateway::start(config).await.err().unwrap();
        assert!(matches!(err, GatewayError::FrontEnd(_)));
    }
}
