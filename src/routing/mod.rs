//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → table.rs (route lookup, longest prefix)
//!     → matcher.rs (segment-boundary prefix match)
//!     → Return: matched Route or None (front end serves it)
//!
//! Route installation (at startup):
//!     resolved ServiceDescriptor (prefix, url)
//!     → matcher.rs (normalize prefix, skip "" and "/")
//!     → table.rs (parse origin, reject collisions)
//!     → new table published by the gateway
//! ```

pub mod matcher;
pub mod table;

pub use matcher::{is_trivial_prefix, normalize_prefix, PathPrefixMatcher};
pub use table::{Origin, Route, RouteInstallError, RouteTable};
