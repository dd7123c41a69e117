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

#[tokio::test]
async fn request_connection_skips_connected_server_peers() {
    let mut broker = Broker::new(node_ctx());
    let (tx, _rx) = mpsc::channel(64);
    broker.register_peer(ConnId::next(), "10.0.0.2", 5000, tx);

    broker.request_connection("10.0.0.2", 5000);
    assert_eq!(broker.pending_dial_count(), 0, "already-connected peer");

    // Same host on another port is a different peer.
    broker.request_connection("10.0.0.2", 5001);
    assert_eq!(broker.pending_dial_count(), 1);
}

#[tokio::test]
async fn unclassified_connections_do_not_suppress_dials() {
    let mut broker = Broker::new(node_ctx());
    let (tx, _rx) = mpsc::channel(64);
    broker.register_inbound(ConnId::next(), "10.0.0.3:6000".parse().unwrap(), tx);

    // The inbound connection at that address has not proven itself a
    // server, so a dial request for it still queues.
    broker.request_connection("10.0.0.3", 6000);
    assert_eq!(broker.pending_dial_count(), 1);
}

#[tokio::test]
async fn pending_queue_is_fifo_and_allows_duplicates() {
    let mut broker = Broker::new(node_ctx());
    broker.request_connection("10.0.0.4", 5000);
    broker.request_connection("10.0.0.5", 5000);
    broker.request_connection("10.0.0.4", 5000);
    assert_eq!(broker.pending_dial_count(), 3);

    assert_eq!(broker.take_pending_dial().unwrap().host, "10.0.0.4");
    assert_eq!(broker.take_pending_dial().unwrap().host, "10.0.0.5");
    assert_eq!(broker.take_pending_dial().unwrap().host, "10.0.0.4");
    assert!(broker.take_pending_dial().is_none());
}

#[tokio::test]
async fn list_peers_starts_with_local_node() {
    let mut broker = Broker::new(node_ctx());
    assert_eq!(broker.list_peers(), "G1,10.0.0.1,4000;");

    let (tx, mut rx) = mpsc::channel(64);
    let peer = ConnId::next();
    broker.register_peer(peer, "10.0.0.2", 5000, tx);
    assert_eq!(rx.try_recv().unwrap(), "*QUERYSERVERS,G1#");
    broker.handle_data(peer, b"*CONNECTED,G2,10.0.0.2,5000;#");

    let list = broker.list_peers();
    assert!(list.starts_with("G1,10.0.0.1,4000;"));
    assert!(list.contains("G2,10.0.0.2,5000;"));
}

#[tokio::test]
async fn list_peers_excludes_clients_and_unclassified() {
    let mut broker = Broker::new(node_ctx());
    let (tx, _rx) = mpsc::channel(64);
    let client = ConnId::next();
    broker.register_inbound(client, "127.0.0.1:9100".parse().unwrap(), tx);
    broker.handle_data(client, b"*LISTSERVERS#");

    let (tx2, _rx2) = mpsc::channel(64);
    broker.register_inbound(ConnId::next(), "127.0.0.1:9101".parse().unwrap(), tx2);

    // Only the local node shows: neither a client nor an unclassified
    // connection belongs in the gossip payload.
    assert_eq!(broker.list_peers(), "G1,10.0.0.1,4000;");
}
