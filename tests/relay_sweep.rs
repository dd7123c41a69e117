use groupmesh::broker::{Broker, ConnId};
use groupmesh::node::NodeContext;
use tokio::sync::mpsc;

fn node_ctx() -> NodeContext {
    NodeContext {
        group_id: "G1".to_string(),
        ip: "10.0.0.1".to_string(),
        port: 4000,
    }
}

/// Dialed peer that has completed the greeting exchange and declared
/// its group id.
fn attach_known_peer(
    broker: &mut Broker,
    host: &str,
    port: u16,
    group: &str,
) -> (ConnId, mpsc::Receiver<String>) {
    let (tx, mut rx) = mpsc::channel(64);
    let id = ConnId::next();
    broker.register_peer(id, host, port, tx);
    assert_eq!(rx.try_recv().unwrap(), "*QUERYSERVERS,G1#");
    broker.handle_data(id, format!("*CONNECTED,{},{},{};#", group, host, port).as_bytes());
    (id, rx)
}

#[tokio::test]
async fn sweep_flushes_queue_for_declared_group() {
    let mut broker = Broker::new(node_ctx());
    let (peer, mut rx) = attach_known_peer(&mut broker, "10.0.0.2", 5000, "G2");

    let (ctx, _crx) = mpsc::channel(64);
    let client = ConnId::next();
    broker.register_inbound(client, "127.0.0.1:9200".parse().unwrap(), ctx);
    broker.handle_data(client, b"*SEND_MSG,G2,first#*SEND_MSG,G2,second#*SEND_MSG,G3,other#");

    broker.relay_sweep();

    assert_eq!(rx.try_recv().unwrap(), "*SEND_MSG,G2,G1,first#");
    assert_eq!(rx.try_recv().unwrap(), "*SEND_MSG,G2,G1,second#");
    assert!(rx.try_recv().is_err(), "no poll without reported backlog");
    assert_eq!(broker.queue_depth("G2"), 0);
    // G3 has no connected home; its queue stays put.
    assert_eq!(broker.queue_depth("G3"), 1);
    assert!(broker.is_open(peer));
}

#[tokio::test]
async fn sweep_polls_peer_with_reported_backlog() {
    let mut broker = Broker::new(node_ctx());
    let (peer, mut rx) = attach_known_peer(&mut broker, "10.0.0.2", 5000, "G2");

    broker.handle_data(peer, b"*KEEPALIVE,3#");
    broker.relay_sweep();
    assert_eq!(rx.try_recv().unwrap(), "*GET_MSG,G1#");

    // The count is not consumed by polling; only a fresh KEEPALIVE
    // changes it, so the next sweep polls again.
    broker.relay_sweep();
    assert_eq!(rx.try_recv().unwrap(), "*GET_MSG,G1#");

    broker.handle_data(peer, b"*KEEPALIVE,0#");
    broker.relay_sweep();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn sweep_keeps_overflow_for_later_sweeps() {
    let mut broker = Broker::new(node_ctx());
    let (_peer, mut rx) = attach_known_peer(&mut broker, "10.0.0.2", 5000, "G2");

    let (ctx, _crx) = mpsc::channel(64);
    let client = ConnId::next();
    broker.register_inbound(client, "127.0.0.1:9202".parse().unwrap(), ctx);
    for i in 0..100 {
        broker.handle_data(client, format!("*SEND_MSG,G2,m{}#", i).as_bytes());
    }

    // The peer channel holds 64 frames; the overflow stays queued in
    // FIFO order for the next sweep.
    broker.relay_sweep();
    assert_eq!(broker.queue_depth("G2"), 36);

    let mut got = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        got.push(frame);
    }
    assert_eq!(got.len(), 64);
    assert_eq!(got[0], "*SEND_MSG,G2,G1,m0#");

    broker.relay_sweep();
    while let Ok(frame) = rx.try_recv() {
        got.push(frame);
    }
    assert_eq!(got.len(), 100);
    assert_eq!(got[64], "*SEND_MSG,G2,G1,m64#");
    assert_eq!(broker.queue_depth("G2"), 0);
}

#[tokio::test]
async fn sweep_ignores_clients() {
    let mut broker = Broker::new(node_ctx());
    let (tx, mut rx) = mpsc::channel(64);
    let client = ConnId::next();
    broker.register_inbound(client, "127.0.0.1:9201".parse().unwrap(), tx);
    broker.handle_data(client, b"*SEND_MSG,G2,hello#");

    broker.relay_sweep();
    assert!(rx.try_recv().is_err(), "clients never receive sweep traffic");
    assert_eq!(broker.queue_depth("G2"), 1);
}

#[tokio::test]
async fn sweep_without_declared_group_only_polls() {
    let mut broker = Broker::new(node_ctx());
    // Peer registered but its CONNECTED reply never arrived.
    let (tx, mut rx) = mpsc::channel(64);
    let peer = ConnId::next();
    broker.register_peer(peer, "10.0.0.2", 5000, tx);
    assert_eq!(rx.try_recv().unwrap(), "*QUERYSERVERS,G1#");
    broker.handle_data(peer, b"*KEEPALIVE,1#");

    broker.relay_sweep();
    assert_eq!(rx.try_recv().unwrap(), "*GET_MSG,G1#");
    assert!(rx.try_recv().is_err());
}
