//! Ephemeral port allocation.
//!
//! The port is free when this returns but is not reserved: another process
//! may claim it before the real listener binds. Acceptable for loopback
//! allocation on a single host.
//!
//! Allocation happens on 127.0.0.1, the address services default to, so
//! the port is known free on the family the listener will bind.

use std::net::{Ipv4Addr, TcpListener};
use thiserror::Error;

/// No local port could be obtained from the OS.
#[derive(Debug, Error)]
#[error("Failed to allocate ephemeral port: {0}")]
pub struct PortAllocationError(#[from] std::io::Error);

/// Ask the OS for an unused local TCP port.
pub fn allocate_ephemeral_port() -> Result<u16, PortAllocationError> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}
