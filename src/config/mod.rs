//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (locate, parse & deserialize, defaults on failure)
//!     → GatewayConfig
//!     → store.rs (versioned snapshot, shared via Arc)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → sent to the gateway over an mpsc channel
//!     → atomic swap in ConfigStore (version + 1)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - A reload replaces the stored value only; running listeners and
//!   installed routes are not rebuilt

pub mod loader;
pub mod schema;
pub mod store;
pub mod watcher;

pub use loader::{ConfigError, LoadOutcome};
pub use schema::GatewayConfig;
pub use schema::ServiceDescriptor;
pub use store::{ConfigStore, VersionedConfig};
