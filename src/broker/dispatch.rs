// src/broker/dispatch.rs
// Per-command state machine. Each decoded command body lands here; the
// observable effects are store mutation, member mutation, connection close
// and reply frames on the originating connection.

use crate::broker::{Broker, ConnId, Identity};
use crate::constants::{REPLY_NOT_SERVER, REPLY_UNKNOWN};
use crate::events::dispatcher::emit_protocol;
use crate::events::model::LogLevel;
use crate::protocol::{lookup, make_frame, CommandKind};
use crate::store::StoredMessage;

impl Broker {
    pub(crate) fn dispatch(&mut self, id: ConnId, body: &str) {
        // split() yields at least one element even for "", and split_frames
        // never hands us an empty body, so the keyword is always present.
        let keyword = body.split(',').next().unwrap_or_default();

        let Some(spec) = lookup(keyword) else {
            emit_protocol(
                "dispatch",
                LogLevel::Warn,
                "unknown_command",
                Some(keyword.to_string()),
                Some(id.to_string()),
            );
            self.send(id, REPLY_UNKNOWN);
            return;
        };

        let identity = match self.member(id) {
            Some(m) => m.identity,
            None => return,
        };

        // Declarative identity gate: server-tagged commands are refused for
        // non-server senders, except QUERYSERVERS which is how a connection
        // becomes a server peer in the first place.
        if spec.min_identity == Identity::Server
            && spec.kind != CommandKind::QueryServers
            && identity != Identity::Server
        {
            emit_protocol(
                "dispatch",
                LogLevel::Warn,
                "server_command_rejected",
                Some(keyword.to_string()),
                Some(id.to_string()),
            );
            self.send(id, REPLY_NOT_SERVER);
            return;
        }

        match spec.kind {
            CommandKind::GetMsg => self.handle_get_msg(id, body),
            CommandKind::SendMsg => self.handle_send_msg(id, identity, body),
            CommandKind::ListServers => self.handle_listservers(id, identity),
            CommandKind::QueryServers => self.handle_queryservers(id, identity, body),
            CommandKind::KeepAlive => self.handle_keepalive(id, body),
            CommandKind::Leave => self.handle_leave(id, body),
            CommandKind::StatusReq => self.handle_statusreq(id),
            CommandKind::Connected => self.handle_connected(id, body),
        }
    }

    /// Drain every message queued for the named group onto this connection.
    fn handle_get_msg(&mut self, id: ConnId, body: &str) {
        let Some(group) = field(body, 1) else {
            self.malformed(id, "GET_MSG");
            return;
        };
        self.promote_client(id);
        while let Some(msg) = self.store.dequeue(&group) {
            let reply = format!("SEND_MSG,{},{},{}", group, msg.sender_group, msg.payload);
            if !self.send(id, &make_frame(&reply)) {
                // Channel full: keep the message, resume on the next poll.
                self.store.requeue(&group, msg);
                break;
            }
        }
    }

    /// Clients name a destination and a payload; relaying servers also name
    /// the original sender. Payload is opaque and keeps embedded commas.
    fn handle_send_msg(&mut self, id: ConnId, identity: Identity, body: &str) {
        if identity == Identity::Server {
            let mut parts = body.splitn(4, ',');
            let (_, dest, from, payload) =
                (parts.next(), parts.next(), parts.next(), parts.next());
            match (dest, from, payload) {
                (Some(dest), Some(from), Some(payload)) if !dest.is_empty() => {
                    self.store.enqueue(dest, StoredMessage::new(from, payload));
                }
                _ => self.malformed(id, "SEND_MSG"),
            }
        } else {
            let mut parts = body.splitn(3, ',');
            let (_, dest, payload) = (parts.next(), parts.next(), parts.next());
            match (dest, payload) {
                (Some(dest), Some(payload)) if !dest.is_empty() => {
                    let sender = self.ctx.group_id.clone();
                    self.store.enqueue(dest, StoredMessage::new(sender, payload));
                    self.promote_client(id);
                }
                _ => self.malformed(id, "SEND_MSG"),
            }
        }
    }

    /// Client-facing view of the mesh. Servers get the same list through
    /// QUERYSERVERS, so a server sending LISTSERVERS is ignored.
    fn handle_listservers(&mut self, id: ConnId, identity: Identity) {
        if identity == Identity::Server {
            emit_protocol(
                "dispatch",
                LogLevel::Debug,
                "listservers_from_server_ignored",
                None,
                Some(id.to_string()),
            );
            return;
        }
        self.promote_client(id);
        let reply = format!("CONNECTED,{}", self.list_peers());
        self.send(id, &make_frame(&reply));
    }

    /// Promote the sender to a server peer and reply with the peer list.
    /// A peer announcing our own group id is dialing itself through the
    /// mesh; that connection is closed, the node keeps running.
    fn handle_queryservers(&mut self, id: ConnId, identity: Identity, body: &str) {
        let Some(group) = field(body, 1) else {
            self.malformed(id, "QUERYSERVERS");
            return;
        };
        if identity != Identity::Server {
            if group == self.ctx.group_id {
                emit_protocol(
                    "dispatch",
                    LogLevel::Error,
                    "self_connection_rejected",
                    Some(group),
                    Some(id.to_string()),
                );
                self.close(id);
                return;
            }
            if let Some(conn) = self.registry.get_mut(&id) {
                conn.member.identity = Identity::Server;
                conn.member.group_id = Some(group);
            }
        }
        let reply = format!("CONNECTED,{}", self.list_peers());
        self.send(id, &make_frame(&reply));
    }

    /// Record how many messages the peer holds for us; the relay sweep uses
    /// the count to decide whether to poll. A bad number is ignored.
    fn handle_keepalive(&mut self, id: ConnId, body: &str) {
        let Some(count) = field(body, 1) else {
            return;
        };
        match count.parse::<u32>() {
            Ok(n) => {
                if let Some(conn) = self.registry.get_mut(&id) {
                    conn.member.pending_remote = n;
                }
            }
            Err(_) => {
                emit_protocol(
                    "dispatch",
                    LogLevel::Debug,
                    "keepalive_malformed",
                    Some(count),
                    Some(id.to_string()),
                );
            }
        }
    }

    /// A peer leaving tells each neighbor to drop the link by naming the
    /// neighbor's own address. Any other address means nothing to us.
    fn handle_leave(&mut self, id: ConnId, body: &str) {
        let (ip, port) = match (field(body, 1), field(body, 2)) {
            (Some(ip), Some(port)) => (ip, port),
            _ => {
                self.malformed(id, "LEAVE");
                return;
            }
        };
        if self.ctx.is_self_addr(&ip, &port) {
            self.close(id);
        }
    }

    fn handle_statusreq(&mut self, id: ConnId) {
        let mut reply = String::from("STATUSRESP");
        for (group, depth) in self.store.depths() {
            reply.push(',');
            reply.push_str(&group);
            reply.push(',');
            reply.push_str(&depth.to_string());
        }
        self.send(id, &make_frame(&reply));
    }

    /// The reply to our QUERYSERVERS greeting: the first entry carries the
    /// peer's own group id. The nested peer list is NOT followed with
    /// automatic dials; transitive discovery from CONNECTED is excluded.
    fn handle_connected(&mut self, id: ConnId, body: &str) {
        let Some(group) = field(body, 1) else {
            self.malformed(id, "CONNECTED");
            return;
        };
        if let Some(conn) = self.registry.get_mut(&id) {
            conn.member.group_id = Some(group);
        }
    }

    fn promote_client(&mut self, id: ConnId) {
        if let Some(conn) = self.registry.get_mut(&id) {
            if conn.member.identity == Identity::Unclassified {
                conn.member.identity = Identity::Client;
            }
        }
    }

    fn malformed(&self, id: ConnId, keyword: &str) {
        emit_protocol(
            "dispatch",
            LogLevel::Debug,
            "malformed_command",
            Some(keyword.to_string()),
            Some(id.to_string()),
        );
    }
}

/// Comma field accessor; `None` when the field is missing or empty.
fn field(body: &str, index: usize) -> Option<String> {
    body.split(',')
        .nth(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
