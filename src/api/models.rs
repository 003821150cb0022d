use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::{NodeError, Result};
use crate::network::{Event, EventSender, Node};
use crate::transaction::Transaction;

/// Shared handler state: the node and the producer side of its event bus.
pub struct AppState {
    pub node: Arc<Node>,
    pub events: EventSender,
}

impl AppState {
    pub fn new(node: Arc<Node>, events: EventSender) -> Self {
        Self { node, events }
    }

    /// Queue an event for the dispatcher.
    pub fn publish(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| NodeError::EventBusClosed)
    }
}

/// `{message, data}` wrapper every `/api` response body uses.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Debug, Serialize, Deserialize)]
pub struct FullChainData {
    pub fullchains: Vec<Block>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: String,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub endpoint: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesData {
    pub nodes: Vec<String>,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct PendingData {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}
