//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (service, address, prefix)
//!     → tower_http TraceLayer spans per request on every listener
//!
//! Consumer:
//!     → logging.rs (fmt subscriber, filter from RUST_LOG or `verbose`)
//! ```

pub mod logging;
