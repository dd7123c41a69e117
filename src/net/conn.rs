// src/net/conn.rs
// Per-connection reader and writer tasks. The reader forwards raw byte
// runs (and EOF) to the broker; the writer drains queued outgoing frames
// into the socket. Neither touches broker state directly.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;

use crate::broker::{BrokerEvent, ConnId};
use crate::constants::{CONN_SEND_CAPACITY, READ_BUFFER_SIZE};
use crate::events::dispatcher::emit_network;
use crate::events::model::LogLevel;

/// Spawn the writer task for one connection and hand back the sender the
/// broker queues frames on. The task ends when the broker drops the sender
/// (protocol-mandated close) or a write fails.
pub fn spawn_writer(id: ConnId, mut write_half: OwnedWriteHalf) -> mpsc::Sender<String> {
    let (tx, mut rx) = mpsc::channel::<String>(CONN_SEND_CAPACITY);
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = write_half.write_all(frame.as_bytes()).await {
                emit_network(
                    "conn",
                    LogLevel::Error,
                    "write_failed",
                    None,
                    Some(format!("{} {}", id, e)),
                );
                break;
            }
        }
    });
    tx
}

/// Spawn the reader task for one connection. A zero-length read is the
/// peer closing its end and becomes a Closed event; read errors are
/// treated the same way so the broker reaps the connection either way.
pub fn spawn_reader(id: ConnId, mut read_half: OwnedReadHalf, events: mpsc::Sender<BrokerEvent>) {
    tokio::spawn(async move {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        loop {
            match read_half.read(&mut buf).await {
                Ok(0) => {
                    let _ = events.send(BrokerEvent::Closed { id }).await;
                    break;
                }
                Ok(n) => {
                    let data = BrokerEvent::Data {
                        id,
                        bytes: buf[..n].to_vec(),
                    };
                    if events.send(data).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    emit_network(
                        "conn",
                        LogLevel::Error,
                        "read_failed",
                        None,
                        Some(format!("{} {}", id, e)),
                    );
                    let _ = events.send(BrokerEvent::Closed { id }).await;
                    break;
                }
            }
        }
    });
}
