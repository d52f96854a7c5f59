//! Configuration reload handling.
//!
//! A reload replaces the stored configuration and applies the log
//! verbosity. Listeners that are already running and routes that are
//! already installed stay as they are.

use crate::config::{ConfigStore, GatewayConfig};
use crate::observability::logging::LogFilter;

/// Swap in `config`, returning the new version.
pub fn apply_reload(store: &ConfigStore, config: GatewayConfig, log: Option<&LogFilter>) -> u64 {
    let previous = store.current();
    let services_changed = previous.config.services != config.services;
    let verbose = config.verbose;
    let version = store.replace(config);

    if let Some(log) = log.filter(|_| verbose != previous.config.verbose) {
        match log.set_verbose(verbose) {
            Ok(()) => tracing::warn!(version, verbose, "Log verbosity changed"),
            Err(e) => tracing::error!(version, error = %e, "Log verbosity not changed"),
        }
    }

    tracing::info!(version, "Configuration reloaded");
    if services_changed {
        tracing::warn!(version, "Service list changed; running services are not rebuilt until restart");
    }
    version
}
