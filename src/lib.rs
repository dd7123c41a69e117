//! # groupmesh
//!
//! Store-and-forward relay node for a small group messaging mesh. Each
//! node is both a broker for locally attached clients (addressed by group
//! id) and a peer in a federation of broker nodes: it gossips the set of
//! known peers and forwards messages addressed to groups it does not serve.
//!
//! ## Design Principles
//! * Async-first: all I/O paths are non-blocking (Tokio).
//! * Single owner: one broker task holds the connection registry, member
//!   table and message store; no locks, no shared mutation.
//! * Task-per-connection: reader and writer tasks speak to the broker
//!   exclusively over channels.
//! * Event-driven instrumentation (JSON line audit log + console).
//!
//! ## Key Modules
//! * `config` – Runtime configuration (TOML) and defaults.
//! * `node` – Immutable node identity (group id, ip, listening port).
//! * `protocol` – Wire framing and the fixed command table.
//! * `store` – Per-destination-group FIFO message queues.
//! * `broker` – Connection registry, command dispatcher, gossip, relay sweep.
//! * `net` – Listener, per-connection tasks, outbound dialer, run loop.
//! * `events` – Structured logging/events dispatcher.

pub mod broker;
pub mod config;
pub mod constants;
pub mod events;
pub mod net;
pub mod node;
pub mod protocol;
pub mod store;
