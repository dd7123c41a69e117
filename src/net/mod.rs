// src/net/mod.rs
// Socket plumbing around the broker: the listener, per-connection tasks,
// the outbound dialer and the run loop that ties them together.

pub mod conn;
pub mod dial;
pub mod listener;

use tokio::sync::mpsc;

use crate::broker::Broker;
use crate::constants::BROKER_EVENT_CAPACITY;
use crate::events::dispatcher::emit_network;
use crate::events::model::LogLevel;
use crate::node::NodeContext;

/// Run the node forever: bind the listener (fatal on failure), seed the
/// bootstrap dials, then loop servicing the mesh. Each iteration drains
/// pending outbound attempts, runs the relay sweep, and then parks on the
/// event channel — the single suspension point. Pacing of the sweep is
/// deliberately coupled to I/O activity, as in the wire protocol's
/// reference behavior; there is no independent timer.
pub async fn run(ctx: NodeContext, bootstrap_nodes: Vec<String>) -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel(BROKER_EVENT_CAPACITY);

    let listener = listener::bind_listener(ctx.port).await?;
    tokio::spawn(listener::accept_loop(listener, event_tx.clone()));

    let mut broker = Broker::new(ctx);
    for entry in bootstrap_nodes {
        match parse_host_port(&entry) {
            Some((host, port)) => broker.request_connection(&host, port),
            None => emit_network(
                "net",
                LogLevel::Warn,
                "bootstrap_addr_invalid",
                Some(entry),
                None,
            ),
        }
    }

    loop {
        while let Some(target) = broker.take_pending_dial() {
            tokio::spawn(dial::dial_peer(target, event_tx.clone()));
        }

        broker.relay_sweep();

        // accept_loop holds a sender for the life of the process, so a
        // closed channel means the runtime is tearing down.
        let event = event_rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("broker event channel closed"))?;
        broker.handle_event(event);
    }
}

fn parse_host_port(entry: &str) -> Option<(String, u16)> {
    let (host, port) = entry.rsplit_once(':')?;
    let port = port.parse().ok()?;
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}
