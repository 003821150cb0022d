use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Event, PeerTransport};
use crate::blockchain::{Block, DifficultyTarget, Ledger, LedgerParams};
use crate::error::{NodeError, Result};

/// Low-difficulty ledger so tests mine in microseconds.
pub fn test_ledger() -> Ledger {
    Ledger::new(LedgerParams {
        difficulty: DifficultyTarget::with_zeros(1),
        mining_threshold: 2,
        coinbase_reward: 1,
        miner_address: "test-miner".into(),
    })
}

/// In-memory peers: canned chains, endpoints that always fail, and a record
/// of everything sent.
#[derive(Default)]
pub struct FakeTransport {
    chains: HashMap<String, Vec<Block>>,
    down: HashSet<String>,
    fetches: Mutex<HashMap<String, usize>>,
    sent: Mutex<Vec<(String, Event)>>,
    registrations: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn with_chain(mut self, endpoint: &str, chain: Vec<Block>) -> Self {
        self.chains.insert(endpoint.to_string(), chain);
        self
    }

    pub fn failing(mut self, endpoint: &str) -> Self {
        self.down.insert(endpoint.to_string());
        self
    }

    pub fn fetch_count(&self, endpoint: &str) -> usize {
        self.fetches.lock().get(endpoint).copied().unwrap_or(0)
    }

    pub fn sent(&self) -> Vec<(String, Event)> {
        self.sent.lock().clone()
    }

    pub fn registrations(&self) -> Vec<(String, String)> {
        self.registrations.lock().clone()
    }

    fn unavailable(&self, endpoint: &str) -> Result<()> {
        if self.down.contains(endpoint) {
            Err(NodeError::PeerStatus {
                endpoint: endpoint.to_string(),
                status: 503,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PeerTransport for FakeTransport {
    async fn fetch_chain(&self, endpoint: &str) -> Result<Vec<Block>> {
        *self.fetches.lock().entry(endpoint.to_string()).or_default() += 1;
        self.unavailable(endpoint)?;
        self.chains
            .get(endpoint)
            .cloned()
            .ok_or_else(|| NodeError::PeerStatus {
                endpoint: endpoint.to_string(),
                status: 404,
            })
    }

    async fn send_event(&self, endpoint: &str, event: &Event) -> Result<()> {
        self.unavailable(endpoint)?;
        self.sent.lock().push((endpoint.to_string(), event.clone()));
        Ok(())
    }

    async fn register_with(&self, endpoint: &str, own_endpoint: &str) -> Result<()> {
        self.unavailable(endpoint)?;
        self.registrations
            .lock()
            .push((endpoint.to_string(), own_endpoint.to_string()));
        Ok(())
    }
}
