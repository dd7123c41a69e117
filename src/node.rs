// src/node.rs
// Immutable per-process identity, resolved once at startup and passed to
// every component that needs it.

use std::net::UdpSocket;

/// Who this node is on the mesh: its group id, its outward-facing IP and
/// the port it listens on. Cheap to clone, never mutated after startup.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub group_id: String,
    pub ip: String,
    pub port: u16,
}

impl NodeContext {
    pub fn new(group_id: String, port: u16) -> Self {
        Self {
            group_id,
            ip: local_ip(),
            port,
        }
    }

    /// True when the given address names this node itself (LEAVE checks).
    pub fn is_self_addr(&self, ip: &str, port: &str) -> bool {
        ip == self.ip && port == self.port.to_string()
    }
}

/// Resolve the local outward-facing IPv4 address. Opens a UDP socket toward
/// a public address (nothing is sent) and reads the chosen source address.
/// Falls back to loopback on hosts with no route.
pub fn local_ip() -> String {
    let resolved = UdpSocket::bind("0.0.0.0:0")
        .and_then(|sock| {
            sock.connect("8.8.8.8:80")?;
            sock.local_addr()
        })
        .map(|addr| addr.ip().to_string());
    resolved.unwrap_or_else(|_| "127.0.0.1".to_string())
}
