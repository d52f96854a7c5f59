//! Front-door gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ front-end listener ──▶ routing table ──▶ proxy ──▶ backend origin
//!                     │                (longest prefix)            ├─ local static listener
//!                     │ no match                                   └─ external service
//!                     ▼
//!               root content / 404
//!
//!   config file ──▶ loader ──▶ Gateway::start (per service: resolve → launch → route)
//!        └──▶ watcher ──▶ ConfigStore swap + log filter on change
//! ```

use std::path::PathBuf;
use clap::Parser;

use front_door::config::loader::load_or_default;
use front_door::config::watcher::ConfigWatcher;
use front_door::observability::logging;
use front_door::Gateway;

#[derive(Parser)]
#[command(name = "front-door")]
#[command(about = "Path-prefix gateway for static sites and local services", long_about = None)]
struct Cli {
    /// Config file (default: ./config/config.toml, then $HOME/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = load_or_default(cli.config.as_deref());
    let log_filter = logging::init(loaded.config.verbose);

    tracing::info!("front-door v{} starting", env!("CARGO_PKG_VERSION"));
    loaded.log();

    tracing::info!(
        bind_address = %loaded.config.bind_address,
        bind_port = loaded.config.bind_port,
        services = loaded.config.services.len(),
        "Configuration in use"
    );

    // The watcher must stay alive for the life of the process.
    let (_watcher, updates) = match &loaded.path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(w) => (Some(w), updates),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Config watcher not started");
                    (None, updates)
                }
            }
        }
        None => (None, tokio::sync::mpsc::unbounded_channel().1),
    };

    let gateway = Gateway::start(loaded.config).await?.with_log_filter(log_filter);
    for failure in gateway.failures() {
        tracing::warn!(service = %failure.name, error = %failure.error, "Service unavailable");
    }

    gateway.run(updates).await;

    Ok(())
}
