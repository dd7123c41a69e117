// src/net/dial.rs
// One outbound connection attempt. Failure reports back to the broker and
// the request is discarded; there is no retry.

use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::broker::{BrokerEvent, ConnId, DialTarget};
use crate::events::dispatcher::emit_network;
use crate::events::model::LogLevel;
use crate::net::conn::{spawn_reader, spawn_writer};

pub async fn dial_peer(target: DialTarget, events: mpsc::Sender<BrokerEvent>) {
    let addr = format!("{}:{}", target.host, target.port);
    emit_network("dial", LogLevel::Info, "dial_start", Some(addr.clone()), None);

    match TcpStream::connect(&addr).await {
        Ok(stream) => {
            let id = ConnId::next();
            let (read_half, write_half) = stream.into_split();
            let tx = spawn_writer(id, write_half);
            spawn_reader(id, read_half, events.clone());
            let _ = events
                .send(BrokerEvent::DialSucceeded {
                    id,
                    host: target.host,
                    port: target.port,
                    tx,
                })
                .await;
        }
        Err(e) => {
            let _ = events
                .send(BrokerEvent::DialFailed {
                    host: target.host,
                    port: target.port,
                    error: e.to_string(),
                })
                .await;
        }
    }
}
