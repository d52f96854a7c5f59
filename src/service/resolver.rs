//! Descriptor resolution.
//!
//! Fills unset fields with defaults, in order:
//! 1. bind port: allocated from the OS (left at 0 if that fails)
//! 2. bind address: loopback
//! 3. route prefix: `/` + last path component of the static directory
//!
//! Resolution never fails.

use crate::config::ServiceDescriptor;
use crate::net::allocate_ephemeral_port;
use crate::routing::normalize_prefix;

/// Default bind address of backend listeners.
///
/// Backends are only reachable through the gateway unless configured
/// otherwise.
pub const DEFAULT_SERVICE_ADDRESS: &str = "127.0.0.1";

/// Resolve a descriptor, filling every unset field it can.
pub fn resolve(mut descriptor: ServiceDescriptor) -> ServiceDescriptor {
    if descriptor.bind_port == 0 {
        match allocate_ephemeral_port() {
            Ok(port) => descriptor.bind_port = port,
            Err(e) => {
                tracing::warn!(service = %descriptor.label(), error = %e, "No port allocated, bind will be attempted on port 0");
            }
        }
    }

    if descriptor.bind_address.is_empty() {
        descriptor.bind_address = DEFAULT_SERVICE_ADDRESS.to_string();
    }

    if descriptor.route_prefix.is_empty() {
        if !descriptor.static_dir.is_empty() {
            descriptor.route_prefix = derive_prefix(&descriptor.static_dir);
        }
    } else {
        descriptor.route_prefix = normalize_prefix(&descriptor.route_prefix);
    }

    tracing::debug!(
        service = %descriptor.label(),
        bind_address = %descriptor.bind_address,
        bind_port = descriptor.bind_port,
        route_prefix = %descriptor.route_prefix,
        "Service resolved"
    );

    descriptor
}

/// `/` followed by everything after the last `/` of `static_dir`.
///
/// A trailing slash leaves nothing after it, giving `/` (no route).
pub fn derive_prefix(static_dir: &str) -> String {
    let last = static_dir.rsplit('/').next().unwrap_or(static_dir);
    format!("/{}", last)
}
