//! Config file watching.
//!
//! The directory holding the file is watched rather than the file itself.
//! Editors that save by writing a temporary file and renaming it over the
//! original replace the inode, which ends a watch placed on the file.
//! Events are filtered down to the config file's name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// Reloads the config file when it changes and sends the result.
pub struct ConfigWatcher {
    file: PathBuf,
    dir: PathBuf,
    updates: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Watcher for `path` and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let watcher = Self {
            file: path.to_path_buf(),
            dir,
            updates,
        };
        (watcher, rx)
    }

    /// Start watching. Events stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { file, dir, updates } = self;
        let name = file.file_name().map(|n| n.to_os_string()).unwrap_or_default();

        let watched = file.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if concerns(&event, &name) => reload(&watched, &updates),
            Ok(_) => {}
            Err(e) => tracing::error!(path = %watched.display(), error = %e, "Config watch error"),
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %file.display(), dir = %dir.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// Whether `event` writes, creates or renames onto the file called `name`.
fn concerns(event: &Event, name: &OsString) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event.paths.iter().any(|p| p.file_name() == Some(name.as_os_str()))
}

fn reload(file: &Path, updates: &mpsc::UnboundedSender<GatewayConfig>) {
    match load_config(file) {
        Ok(config) => {
            tracing::info!(path = %file.display(), "Config file changed");
            if updates.send(config).is_err() {
                tracing::debug!("Config update receiver dropped");
            }
        }
        Err(e) => tracing::error!(path = %file.display(), error = %e, "Config reload failed, keeping current configuration"),
    }
}
