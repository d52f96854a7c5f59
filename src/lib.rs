//! Front-door gateway library.
//!
//! One public listener fans requests out by path prefix to many backends.
//! Each backend is either launched locally as a static-content listener or
//! is an already-running origin that only gets a route.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod service;

pub use config::{GatewayConfig, ServiceDescriptor};
pub use lifecycle::Gateway;
