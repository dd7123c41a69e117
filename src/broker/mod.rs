// src/broker/mod.rs
// The broker task exclusively owns the connection registry, member table,
// message store and pending-dial queue. All mutation happens here, one
// event at a time; no other task touches this state.

pub mod dispatch;
pub mod gossip;
pub mod member;
pub mod sweep;

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::Sender;

use crate::events::dispatcher::emit_network;
use crate::events::model::LogLevel;
use crate::node::NodeContext;
use crate::protocol::{make_frame, split_frames};
use crate::store::MessageStore;

pub use member::{Identity, Member};

/// Opaque handle for a live connection. Allocated process-wide so reader
/// tasks can tag their events before the broker has seen the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

impl ConnId {
    pub fn next() -> Self {
        Self(NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// An outbound connection still waiting to be attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialTarget {
    pub host: String,
    pub port: u16,
}

/// Everything the outside world can tell the broker.
#[derive(Debug)]
pub enum BrokerEvent {
    /// A new inbound connection was accepted.
    Inbound {
        id: ConnId,
        addr: SocketAddr,
        tx: Sender<String>,
    },
    /// An outbound dial completed and the socket is ready.
    DialSucceeded {
        id: ConnId,
        host: String,
        port: u16,
        tx: Sender<String>,
    },
    /// An outbound dial failed; the request is dropped, never retried.
    DialFailed {
        host: String,
        port: u16,
        error: String,
    },
    /// Raw bytes read from a connection, possibly several frames.
    Data { id: ConnId, bytes: Vec<u8> },
    /// The peer closed its end (zero-length read).
    Closed { id: ConnId },
}

pub(crate) struct Connection {
    pub member: Member,
    tx: Sender<String>,
}

pub struct Broker {
    pub(crate) ctx: NodeContext,
    pub(crate) registry: HashMap<ConnId, Connection>,
    pub(crate) store: MessageStore,
    pub(crate) pending_dials: VecDeque<DialTarget>,
}

impl Broker {
    pub fn new(ctx: NodeContext) -> Self {
        Self {
            ctx,
            registry: HashMap::new(),
            store: MessageStore::new(),
            pending_dials: VecDeque::new(),
        }
    }

    pub fn handle_event(&mut self, event: BrokerEvent) {
        match event {
            BrokerEvent::Inbound { id, addr, tx } => self.register_inbound(id, addr, tx),
            BrokerEvent::DialSucceeded { id, host, port, tx } => {
                self.register_peer(id, &host, port, tx)
            }
            BrokerEvent::DialFailed { host, port, error } => {
                emit_network(
                    "broker",
                    LogLevel::Warn,
                    "dial_failed",
                    Some(format!("{}:{}", host, port)),
                    Some(error),
                );
            }
            BrokerEvent::Data { id, bytes } => self.handle_data(id, &bytes),
            BrokerEvent::Closed { id } => self.handle_closed(id),
        }
    }

    /// Register a freshly accepted connection. Identity stays unclassified
    /// until the peer's first command tells us what it is.
    pub fn register_inbound(&mut self, id: ConnId, addr: SocketAddr, tx: Sender<String>) {
        let member = Member::new(Identity::Unclassified, addr.ip().to_string(), addr.port());
        self.registry.insert(id, Connection { member, tx });
        emit_network(
            "broker",
            LogLevel::Info,
            "inbound_registered",
            Some(addr.to_string()),
            Some(id.to_string()),
        );
    }

    /// Register a successfully dialed peer as a server connection and greet
    /// it with QUERYSERVERS so it learns our group id and peer list.
    pub fn register_peer(&mut self, id: ConnId, host: &str, port: u16, tx: Sender<String>) {
        let member = Member::new(Identity::Server, host, port);
        self.registry.insert(id, Connection { member, tx });
        emit_network(
            "broker",
            LogLevel::Info,
            "peer_registered",
            Some(format!("{}:{}", host, port)),
            Some(id.to_string()),
        );
        let greeting = format!("QUERYSERVERS,{}", self.ctx.group_id);
        self.send(id, &make_frame(&greeting));
    }

    /// Feed one raw read to the dispatcher, one decoded command at a time.
    pub fn handle_data(&mut self, id: ConnId, bytes: &[u8]) {
        for body in split_frames(bytes) {
            if !self.registry.contains_key(&id) {
                // A prior frame in this run closed the connection.
                break;
            }
            self.dispatch(id, &body);
        }
    }

    /// Peer-initiated close: tear the connection down, keep serving others.
    pub fn handle_closed(&mut self, id: ConnId) {
        if self.registry.remove(&id).is_some() {
            emit_network(
                "broker",
                LogLevel::Info,
                "peer_disconnected",
                None,
                Some(id.to_string()),
            );
        }
    }

    /// Protocol-mandated close (LEAVE matching self, self-connection).
    /// Dropping the sender closes our write half; the reader task notices
    /// the peer's close later and its Closed event becomes a no-op.
    pub(crate) fn close(&mut self, id: ConnId) {
        if self.registry.remove(&id).is_some() {
            emit_network(
                "broker",
                LogLevel::Info,
                "connection_closed",
                None,
                Some(id.to_string()),
            );
        }
    }

    /// Queue a frame for a connection. The channel is bounded and the
    /// broker never blocks on it: `false` means the frame was not queued
    /// (channel full or connection gone) and the caller still owns the
    /// data, so drains can put a message back instead of losing it.
    pub(crate) fn send(&self, id: ConnId, frame: &str) -> bool {
        let Some(conn) = self.registry.get(&id) else {
            return false;
        };
        if conn.tx.try_send(frame.to_string()).is_ok() {
            return true;
        }
        emit_network(
            "broker",
            LogLevel::Warn,
            "send_channel_full",
            None,
            Some(format!("{} frame={}", id, frame)),
        );
        false
    }

    pub fn member(&self, id: ConnId) -> Option<&Member> {
        self.registry.get(&id).map(|c| &c.member)
    }

    pub fn is_open(&self, id: ConnId) -> bool {
        self.registry.contains_key(&id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn queue_depth(&self, group: &str) -> usize {
        self.store.depth(group)
    }

    pub fn context(&self) -> &NodeContext {
        &self.ctx
    }
}
