use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;

use super::PeerTransport;
use crate::blockchain::{Block, Ledger};
use crate::error::Result;

/// How hard to try each peer before skipping it.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Total tries per peer, at least one.
    pub attempts: u32,
    /// Wait before the second try; doubled after every failure.
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Outcome of one survey of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub replaced: bool,
    pub length: usize,
    pub surveyed: usize,
    pub failed: usize,
}

/// Longest-valid-chain rule: peers are asked one after another and any
/// chain strictly longer than the local one *at that moment* that validates
/// from genesis replaces it.
#[derive(Debug, Clone, Default)]
pub struct ConsensusResolver {
    policy: FetchPolicy,
}

impl ConsensusResolver {
    pub fn new(policy: FetchPolicy) -> Self {
        Self { policy }
    }

    pub async fn resolve(
        &self,
        ledger: &Mutex<Ledger>,
        transport: &dyn PeerTransport,
    ) -> Resolution {
        let peers = ledger.lock().registry().list();
        let mut outcome = Resolution::default();

        for endpoint in peers {
            outcome.surveyed += 1;
            let candidate = match self.fetch_with_retry(transport, &endpoint).await {
                Ok(chain) => chain,
                Err(err) => {
                    warn!("CONSENSUS - skipping {}: {}", endpoint, err);
                    outcome.failed += 1;
                    continue;
                }
            };

            let candidate_len = candidate.len();
            let replaced = {
                let mut guard = ledger.lock();
                if candidate_len <= guard.len() {
                    debug!(
                        "CONSENSUS - {} has {} blocks, local has {}",
                        endpoint,
                        candidate_len,
                        guard.len()
                    );
                    false
                } else if guard.replace_chain(candidate) {
                    true
                } else {
                    debug!("CONSENSUS - {} sent an invalid chain", endpoint);
                    false
                }
            };

            if replaced {
                info!("CONSENSUS - adopted {} blocks from {}", candidate_len, endpoint);
                outcome.replaced = true;
            }
        }

        outcome.length = ledger.lock().len();
        outcome
    }

    async fn fetch_with_retry(
        &self,
        transport: &dyn PeerTransport,
        endpoint: &str,
    ) -> Result<Vec<Block>> {
        let attempts = self.policy.attempts.max(1);
        let mut delay = self.policy.backoff;
        let mut attempt = 1;
        loop {
            match transport.fetch_chain(endpoint).await {
                Ok(chain) => return Ok(chain),
                Err(err) if attempt < attempts => {
                    debug!(
                        "CONSENSUS - fetch {} failed (attempt {}/{}): {}",
                        endpoint, attempt, attempts, err
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
