//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::config::schema::GatewayConfig;

/// File name looked up in each search directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No config.toml found in search path")]
    NotFound,
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Directories searched for `config.toml`, in order: `./config`, then `$HOME`.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("./config").join(CONFIG_FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
    }
    paths
}

/// Find the first existing config file among `candidates`.
pub fn locate_config(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or(ConfigError::NotFound)
}

/// Result of locating and loading the configuration at startup.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Loaded config, or defaults when loading failed.
    pub config: GatewayConfig,
    /// File the config came from (or should come from), for the watcher.
    pub path: Option<PathBuf>,
    /// Why defaults are in use, if they are.
    pub error: Option<ConfigError>,
}

impl LoadOutcome {
    /// Log how the configuration was obtained.
    ///
    /// Separate from loading because logging is configured from the
    /// loaded `verbose` flag.
    pub fn log(&self) {
        match (&self.path, &self.error) {
            (Some(path), None) => {
                tracing::info!(path = %path.display(), services = self.config.services.len(), "Configuration loaded");
            }
            (Some(path), Some(e)) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            }
            (None, Some(e)) => {
                tracing::warn!(error = %e, "Using default configuration");
            }
            (None, None) => {}
        }
    }
}

/// Load the configuration, falling back to defaults on any error.
///
/// `explicit` takes precedence over the search path.
pub fn load_or_default(explicit: Option<&Path>) -> LoadOutcome {
    let located = match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => locate_config(&search_paths()),
    };

    let path = match located {
        Ok(path) => path,
        Err(e) => {
            return LoadOutcome {
                config: GatewayConfig::default(),
                path: None,
                error: Some(e),
            };
        }
    };

    match load_config(&path) {
        Ok(config) => LoadOutcome {
            config,
            path: Some(path),
            error: None,
        },
        // Keep the path so a fixed file is still picked up by the watcher.
        Err(e) => LoadOutcome {
            config: GatewayConfig::default(),
            path: Some(path),
            error: Some(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_camel_case_keys() {
        let config = parse_config(
            r#"
            bindAddress = "127.0.0.1"
            bindPort = 9000
            verbose = false

            [[services]]
            name = "app1"
            staticDir = "./web/app1"

            [[services]]
            url = "http://10.0.0.5:3000"
            routePrefix = "/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 9000);
        assert!(!config.verbose);
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].static_dir, "./web/app1");
        assert_eq!(config.services[1].route_prefix, "/api");
        assert_eq!(config.services[1].bind_port, 0);
    }

    #[test]
    fn accepts_legacy_aliases() {
        let config = parse_config(
            r#"
            bindIp = "10.1.1.1"

            [[servers]]
            bindIp = "127.0.0.2"
            accessPath = "/blog"
            des = "legacy"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address, "10.1.1.1");
        assert_eq!(config.bind_port, 8082);
        assert_eq!(config.services[0].bind_address, "127.0.0.2");
        assert_eq!(config.services[0].route_prefix, "/blog");
        assert_eq!(config.services[0].description, "legacy");
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), GatewayConfig::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_config("bindPort = \"not a port\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn locate_returns_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join(CONFIG_FILE_NAME);
        let mut f = std::fs::File::create(&present).unwrap();
        writeln!(f, "bindPort = 9100").unwrap();

        let found = locate_config(&[missing.clone(), present.clone()]).unwrap();
        assert_eq!(found, present);
        assert!(matches!(locate_config(&[missing]), Err(ConfigError::NotFound)));

        let outcome = load_or_default(Some(&found));
        assert_eq!(outcome.config.bind_port, 9100);
        assert_eq!(outcome.path, Some(present));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let outcome = load_or_default(Some(&path));
        assert_eq!(outcome.config, GatewayConfig::default());
        assert!(matches!(outcome.error, Some(ConfigError::Io(_))));
    }
}
