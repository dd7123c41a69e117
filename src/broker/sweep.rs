// src/broker/sweep.rs
// The periodic relay sweep: runs once per broker iteration, independent of
// any specific incoming message.

use crate::broker::{Broker, ConnId, Identity};
use crate::protocol::make_frame;

impl Broker {
    /// For every connected server peer: flush the queue addressed to its
    /// declared group as SEND_MSG frames, then poll it with GET_MSG if its
    /// last KEEPALIVE reported backlog for us. Delivery to a remote group
    /// is always pull-when-told; nobody pushes into an unknown destination.
    pub fn relay_sweep(&mut self) {
        let peers: Vec<(ConnId, Option<String>, u32)> = self
            .registry
            .iter()
            .filter(|(_, c)| c.member.identity == Identity::Server)
            .map(|(id, c)| (*id, c.member.group_id.clone(), c.member.pending_remote))
            .collect();

        for (id, group_id, pending) in peers {
            if let Some(group) = group_id {
                while let Some(msg) = self.store.dequeue(&group) {
                    let frame =
                        format!("SEND_MSG,{},{},{}", group, msg.sender_group, msg.payload);
                    if !self.send(id, &make_frame(&frame)) {
                        // Channel full: keep the message for a later sweep.
                        self.store.requeue(&group, msg);
                        break;
                    }
                }
            }
            if pending > 0 {
                self.send(id, &make_frame(&format!("GET_MSG,{}", self.ctx.group_id)));
            }
        }
    }
}
