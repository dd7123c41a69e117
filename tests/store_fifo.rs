use groupmesh::store::{MessageStore, StoredMessage};

#[test]
fn fifo_order_per_group() {
    let mut store = MessageStore::new();
    store.enqueue("G7", StoredMessage::new("G1", "first"));
    store.enqueue("G7", StoredMessage::new("G2", "second"));
    store.enqueue("G7", StoredMessage::new("G1", "third"));

    assert_eq!(store.dequeue("G7").unwrap().payload, "first");
    assert_eq!(store.dequeue("G7").unwrap().payload, "second");
    assert_eq!(store.dequeue("G7").unwrap().payload, "third");
    assert!(store.dequeue("G7").is_none());
}

#[test]
fn lookup_does_not_create_queue() {
    let mut store = MessageStore::new();
    assert_eq!(store.depth("nobody"), 0);
    assert!(store.dequeue("nobody").is_none());
    assert!(store.depths().is_empty());
}

#[test]
fn queues_are_independent() {
    let mut store = MessageStore::new();
    store.enqueue("A", StoredMessage::new("G1", "for-a"));
    store.enqueue("B", StoredMessage::new("G1", "for-b-1"));
    store.enqueue("B", StoredMessage::new("G1", "for-b-2"));

    assert_eq!(store.depth("A"), 1);
    assert_eq!(store.depth("B"), 2);

    assert_eq!(store.dequeue("A").unwrap().payload, "for-a");
    assert_eq!(store.depth("A"), 0);
    assert_eq!(store.depth("B"), 2);
}

#[test]
fn depths_reports_drained_groups() {
    let mut store = MessageStore::new();
    store.enqueue("A", StoredMessage::new("G1", "x"));
    store.enqueue("B", StoredMessage::new("G1", "y"));
    store.dequeue("A").unwrap();

    let depths = store.depths();
    assert_eq!(depths, vec![("A".to_string(), 0), ("B".to_string(), 1)]);
}
