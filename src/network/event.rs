use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::blockchain::Block;
use crate::blockchain::block::sha256_hex;
use crate::transaction::Transaction;

/// Gossip message exchanged between nodes: `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    NewTransaction(Transaction),
    NewBlock(Block),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::NewTransaction(_) => "new_transaction",
            Event::NewBlock(_) => "new_block",
        }
    }

    /// Content digest used to recognise an event seen before.
    pub fn digest(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("event serializes to JSON");
        sha256_hex(&bytes)
    }
}

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// A node's private event queue. Producers hold the sender half; the
/// dispatcher owns the receiver and handles one event at a time.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Bounded memory of recently handled event digests.
#[derive(Debug)]
pub struct RelayFilter {
    seen: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl RelayFilter {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// True the first time an event is offered, false while it is remembered.
    pub fn first_sighting(&mut self, event: &Event) -> bool {
        if self.capacity == 0 {
            return true;
        }
        let digest = event.digest();
        if self.seen.contains(&digest) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.seen.insert(digest.clone());
        self.order.push_back(digest);
        true
    }
}
