//! Service binding subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceDescriptor (from config)
//!     → resolver.rs (port, address, prefix defaults)
//!     → launcher.rs (bind + serve static content, set url)
//!       or skip when url is already set
//!     → resolved descriptor with a url, ready for routing
//! ```

pub mod launcher;
pub mod resolver;

pub use launcher::{content_router, launch, launch_with_router};
pub use resolver::{derive_prefix, resolve, DEFAULT_SERVICE_ADDRESS};
