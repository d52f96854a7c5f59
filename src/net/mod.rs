//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Service needs a port
//!     → port.rs (ask the OS for a free one)
//!
//! Service needs a listener
//!     → listener.rs (bind, report failures)
//!     → listener.rs (spawn serve task, return ListenerHandle)
//! ```
//!
//! # Design Decisions
//! - Binding is awaited before returning so bind failures are reported
//! - Serving runs in the background and is never awaited by callers
//! - Every spawned listener is returned as a handle to its owner

pub mod listener;
pub mod port;

pub use listener::{ListenerBindError, ListenerHandle};
pub use port::{allocate_ephemeral_port, PortAllocationError};
