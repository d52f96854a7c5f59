//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → bind front end → per service: resolve → launch → route
//!
//! Reload (reload.rs):
//!     Watcher event → new GatewayConfig → ConfigStore swap (version + 1)
//! ```
//!
//! # Design Decisions
//! - Front-end bind failure is fatal; service failures are recorded
//! - Listener handles are retained by the gateway
//! - No shutdown path: the process runs until it is terminated

pub mod reload;
pub mod startup;

pub use reload::apply_reload;
pub use startup::{Gateway, GatewayError, InstallOutcome, ServiceError, ServiceFailure};
