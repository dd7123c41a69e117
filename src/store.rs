// src/store.rs
// In-memory store-and-forward queues, keyed by destination group id.

use std::collections::{BTreeMap, VecDeque};

/// A queued message: who sent it and the opaque payload. The destination
/// group is the key it is stored under, not part of the message itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub sender_group: String,
    pub payload: String,
}

impl StoredMessage {
    pub fn new(sender_group: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            sender_group: sender_group.into(),
            payload: payload.into(),
        }
    }
}

/// FIFO queues per destination group id. Queues outlive connections: a
/// message may wait here until a peer serving its group connects. Lookups
/// never create a queue; only `enqueue` does.
#[derive(Debug, Default)]
pub struct MessageStore {
    queues: BTreeMap<String, VecDeque<StoredMessage>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, dest_group: &str, msg: StoredMessage) {
        self.queues
            .entry(dest_group.to_string())
            .or_default()
            .push_back(msg);
    }

    /// Pop the oldest message queued for `dest_group`, if any.
    pub fn dequeue(&mut self, dest_group: &str) -> Option<StoredMessage> {
        self.queues.get_mut(dest_group).and_then(VecDeque::pop_front)
    }

    /// Put an undeliverable message back at the head of its queue so a
    /// later drain sees it first again.
    pub fn requeue(&mut self, dest_group: &str, msg: StoredMessage) {
        self.queues
            .entry(dest_group.to_string())
            .or_default()
            .push_front(msg);
    }

    /// Current queue length for a group without creating the queue.
    pub fn depth(&self, dest_group: &str) -> usize {
        self.queues.get(dest_group).map_or(0, VecDeque::len)
    }

    /// Snapshot of every known group's queue depth, in stable key order.
    /// Includes groups whose queue has been drained to zero, matching the
    /// STATUSREQ contract of reporting every group id the store has seen.
    pub fn depths(&self) -> Vec<(String, usize)> {
        self.queues
            .iter()
            .map(|(group, q)| (group.clone(), q.len()))
            .collect()
    }
}
