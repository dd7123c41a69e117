// src/net/listener.rs

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::broker::{BrokerEvent, ConnId};
use crate::events::dispatcher::emit_network;
use crate::events::model::LogLevel;
use crate::net::conn::{spawn_reader, spawn_writer};

/// Bind the listening socket. Failure here is fatal to the whole node.
pub async fn bind_listener(port: u16) -> anyhow::Result<TcpListener> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("could not set up listening socket on {}", addr))?;
    emit_network(
        "listener",
        LogLevel::Info,
        "listener_bind",
        Some(addr),
        None,
    );
    Ok(listener)
}

/// Accept inbound connections forever, wiring each socket to reader and
/// writer tasks and announcing it to the broker with its observed source
/// address. Accept errors are local: log and keep accepting.
pub async fn accept_loop(listener: TcpListener, events: mpsc::Sender<BrokerEvent>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                emit_network(
                    "listener",
                    LogLevel::Info,
                    "incoming_connection",
                    Some(peer_addr.to_string()),
                    None,
                );
                register_inbound(stream, peer_addr, &events).await;
            }
            Err(e) => {
                emit_network(
                    "listener",
                    LogLevel::Error,
                    "accept_failed",
                    None,
                    Some(e.to_string()),
                );
            }
        }
    }
}

async fn register_inbound(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    events: &mpsc::Sender<BrokerEvent>,
) {
    let id = ConnId::next();
    let (read_half, write_half) = stream.into_split();
    let tx = spawn_writer(id, write_half);
    spawn_reader(id, read_half, events.clone());
    let _ = events
        .send(BrokerEvent::Inbound {
            id,
            addr: peer_addr,
            tx,
        })
        .await;
}
