//! Central place for application-wide constants and default values.

/// Default group id announced by this node (overridable in config).
pub const DEFAULT_GROUP_ID: &str = "GROUP_120";

/// Fixed rendezvous peer every node dials once at startup unless the
/// config provides its own bootstrap list.
pub const DEFAULT_BOOTSTRAP_ADDR: &str = "127.0.0.1:5000";

/// Frame delimiters of the wire protocol.
pub const FRAME_START: char = '*';
pub const FRAME_END: char = '#';

/// Literal reply for an unrecognized command keyword.
pub const REPLY_UNKNOWN: &str = "Unknown command";

/// Literal reply when a non-server connection issues a server command.
pub const REPLY_NOT_SERVER: &str = "Trying to use server commands as client";

/// Capacity of each per-connection outgoing frame channel. The broker
/// never blocks on a full channel: reply frames are dropped, stored
/// messages go back to their queue.
pub const CONN_SEND_CAPACITY: usize = 64;

/// Capacity of the broker's inbound event channel.
pub const BROKER_EVENT_CAPACITY: usize = 256;

/// Read buffer size for each connection reader task.
pub const READ_BUFFER_SIZE: usize = 5000;

/// Application / crate version (populated from Cargo.toml via env! macro)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
