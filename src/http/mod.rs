//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Front-end connection
//!     → server.rs (Axum router, route lookup)
//!     → proxy.rs (rewrite origin, stream to backend, relay response)
//!       or static_files.rs (root content, index fallback)
//!
//! Backend listener connection
//!     → static_files.rs (directory content, index fallback)
//! ```

pub mod proxy;
pub mod server;
pub mod static_files;

pub use proxy::{HttpClient, ProxyForwardError};
pub use server::{front_end_router, FrontEndState};
pub use static_files::{empty_router, static_router};
