//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the gateway.
//! Keys are camelCase in config files; the legacy key names
//! (`bindIp`, `accessPath`, `des`, `servers`) are accepted as aliases.

use serde::{Deserialize, Serialize};

/// Default front-end bind address (all interfaces).
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default front-end bind port.
pub const DEFAULT_BIND_PORT: u16 = 8082;

/// Root configuration for the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Front-end bind address.
    #[serde(alias = "bindIp")]
    pub bind_address: String,

    /// Front-end bind port.
    pub bind_port: u16,

    /// Verbose logging.
    pub verbose: bool,

    /// Directory served by the front end itself at `/`.
    pub static_dir: String,

    /// Backend services, in route installation order.
    #[serde(alias = "servers")]
    pub services: Vec<ServiceDescriptor>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            bind_port: DEFAULT_BIND_PORT,
            verbose: true,
            static_dir: String::new(),
            services: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// The descriptor for the front end itself.
    ///
    /// It owns `/`, so its route prefix is always the root and it never
    /// gets a forwarding route.
    pub fn root_descriptor(&self) -> ServiceDescriptor {
        ServiceDescriptor {
            name: "front-end".to_string(),
            static_dir: self.static_dir.clone(),
            route_prefix: "/".to_string(),
            bind_address: self.bind_address.clone(),
            bind_port: self.bind_port,
            url: String::new(),
            description: String::new(),
        }
    }
}

/// One backend service, before or after resolution.
///
/// Empty strings and a zero port mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Label used in logs.
    pub name: String,

    /// Directory whose contents the service listener serves.
    pub static_dir: String,

    /// Path prefix forwarded by the front end.
    #[serde(alias = "accessPath")]
    pub route_prefix: String,

    /// Bind address of the service's own listener.
    #[serde(alias = "bindIp")]
    pub bind_address: String,

    /// Bind port of the service's own listener.
    pub bind_port: u16,

    /// Origin (`scheme://host:port`) of the service. When set in the input,
    /// the service is already running and no listener is launched.
    pub url: String,

    /// Free text.
    #[serde(alias = "des")]
    pub description: String,
}

impl ServiceDescriptor {
    /// Whether the descriptor points at an externally running service.
    pub fn is_external(&self) -> bool {
        !self.url.is_empty()
    }

    /// Name for log output, falling back to the route prefix.
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.route_prefix.is_empty() {
            &self.route_prefix
        } else {
            "<unnamed>"
        }
    }
}
