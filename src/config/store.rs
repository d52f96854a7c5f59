//! Versioned, atomically swappable configuration.

use std::sync::Arc;
use arc_swap::ArcSwap;
use crate::config::schema::GatewayConfig;

/// A configuration snapshot tagged with its version.
///
/// Version 1 is the configuration the process started with; every
/// replacement increments it.
#[derive(Debug)]
pub struct VersionedConfig {
    pub version: u64,
    pub config: GatewayConfig,
}

/// Single accessor for the current configuration.
///
/// Readers take a cheap `Arc` snapshot; writers replace the whole value.
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<VersionedConfig>,
}

impl ConfigStore {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(VersionedConfig { version: 1, config }),
        }
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> Arc<VersionedConfig> {
        self.current.load_full()
    }

    /// Current version number.
    pub fn version(&self) -> u64 {
        self.current.load().version
    }

    /// Replace the configuration, returning the new version.
    pub fn replace(&self, config: GatewayConfig) -> u64 {
        let mut next = None;
        self.current.rcu(|prev| {
            let versioned = Arc::new(VersionedConfig {
                version: prev.version + 1,
                config: config.clone(),
            });
            next = Some(versioned.version);
            versioned
        });
        next.unwrap_or_default()
    }
}
