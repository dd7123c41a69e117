// src/broker/member.rs

/// How far a connection has progressed in declaring itself. Inbound
/// connections start unclassified; the first accepted client command marks
/// them a client; QUERYSERVERS (or a successful outbound dial) makes them a
/// server peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Unclassified,
    Client,
    Server,
}

/// Bookkeeping for one live connection.
#[derive(Debug, Clone)]
pub struct Member {
    pub identity: Identity,
    pub ip: String,
    pub port: u16,
    /// Declared group id, populated by QUERYSERVERS or CONNECTED.
    pub group_id: Option<String>,
    /// Messages the peer reports holding for us (latest KEEPALIVE).
    pub pending_remote: u32,
}

impl Member {
    pub fn new(identity: Identity, ip: impl Into<String>, port: u16) -> Self {
        Self {
            identity,
            ip: ip.into(),
            port,
            group_id: None,
            pending_remote: 0,
        }
    }
}
