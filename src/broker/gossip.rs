// src/broker/gossip.rs
// Peer list construction and the outbound connector's pending queue.

use crate::broker::{Broker, DialTarget, Identity};
use crate::events::dispatcher::emit_network;
use crate::events::model::LogLevel;

impl Broker {
    /// Semicolon-separated `group,ip,port;` entries. The local node always
    /// comes first; only server-identity connections follow. This payload
    /// is how nodes learn of each other transitively.
    pub fn list_peers(&self) -> String {
        let mut result = format!("{},{},{};", self.ctx.group_id, self.ctx.ip, self.ctx.port);
        for conn in self.registry.values() {
            if conn.member.identity == Identity::Server {
                result.push_str(&format!(
                    "{},{},{};",
                    conn.member.group_id.clone().unwrap_or_default(),
                    conn.member.ip,
                    conn.member.port,
                ));
            }
        }
        result
    }

    /// Single entry point for growing the mesh. Idempotent against peers
    /// already connected as servers at exactly this host:port; duplicates
    /// among still-pending requests are allowed (a redundant attempt just
    /// fails or reconnects later).
    pub fn request_connection(&mut self, host: &str, port: u16) {
        let already_connected = self.registry.values().any(|conn| {
            conn.member.identity == Identity::Server
                && conn.member.ip == host
                && conn.member.port == port
        });
        if already_connected {
            emit_network(
                "gossip",
                LogLevel::Debug,
                "dial_suppressed",
                Some(format!("{}:{}", host, port)),
                Some("already connected".to_string()),
            );
            return;
        }
        self.pending_dials.push_back(DialTarget {
            host: host.to_string(),
            port,
        });
    }

    /// Next queued outbound attempt, if any. The run loop drains this
    /// before each wait.
    pub fn take_pending_dial(&mut self) -> Option<DialTarget> {
        self.pending_dials.pop_front()
    }

    pub fn pending_dial_count(&self) -> usize {
        self.pending_dials.len()
    }
}
