use std::sync::Arc;
use std::time::Duration;

use actix_web::rt::task::JoinHandle;
use actix_web::{rt, web};
use log::{debug, error, info, warn};
use parking_lot::Mutex;

use super::{ConsensusResolver, Event, EventReceiver, PeerTransport, RelayFilter, Resolution};
use crate::blockchain::{Block, Ledger, pow};
use crate::error::{NodeError, Result};

/// One running node: its ledger plus the peers it gossips with.
pub struct Node {
    name: String,
    ledger: Mutex<Ledger>,
    transport: Arc<dyn PeerTransport>,
    resolver: ConsensusResolver,
    relay: Mutex<RelayFilter>,
}

impl Node {
    /// `relay_memory` is how many recent transactions to remember for loop
    /// suppression; 0 re-handles and re-broadcasts every delivery.
    pub fn new(
        name: impl Into<String>,
        ledger: Ledger,
        transport: Arc<dyn PeerTransport>,
        resolver: ConsensusResolver,
        relay_memory: usize,
    ) -> Self {
        Self {
            name: name.into(),
            ledger: Mutex::new(ledger),
            transport,
            resolver,
            relay: Mutex::new(RelayFilter::new(relay_memory)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ledger(&self) -> &Mutex<Ledger> {
        &self.ledger
    }

    /// React to one inbound event. Runs to completion (including any mining
    /// it triggers) before the dispatcher looks at the next event.
    pub async fn handle_event(&self, event: Event) {
        match event {
            Event::NewTransaction(tx) => {
                let relayed = Event::NewTransaction(tx.clone());
                if !self.relay.lock().first_sighting(&relayed) {
                    debug!("EVENT - dropping transaction already relayed");
                    return;
                }

                info!("EVENT - received transaction {} -> {} ({})", tx.input, tx.output, tx.amount);
                let ready = self.ledger.lock().accept_transaction(tx);
                self.broadcast(relayed);

                if ready {
                    if let Err(err) = self.mine_block().await {
                        error!("EVENT - mining failed: {}", err);
                    }
                }
            }
            Event::NewBlock(block) => {
                let valid = self.ledger.lock().receive_block_announcement(&block);
                info!(
                    "EVENT - received block announcement (prev={}, valid on tip: {})",
                    block.header.previous_block_hash, valid
                );
            }
        }
    }

    /// Mine one block from the pool on the blocking pool, append it and
    /// announce it to every peer.
    pub async fn mine_block(&self) -> Result<Block> {
        let mut job = self.ledger.lock().prepare_mining();
        info!("MINER - mining {} pooled txs on {}", job.transactions.len(), job.previous_block_hash);

        loop {
            let previous = job.previous_block_hash.clone();
            let difficulty = job.difficulty.clone();
            let header = match web::block(move || pow::mine(&previous, &difficulty)).await {
                Ok(header) => header,
                Err(err) => {
                    self.ledger.lock().abandon_job(job);
                    return Err(NodeError::Mining(err.to_string()));
                }
            };

            let committed = self.ledger.lock().commit_mined(job, header);
            match committed {
                Ok(block) => {
                    info!("MINER - new block forged (nonce={})", block.header.nonce);
                    self.broadcast(Event::NewBlock(block.clone()));
                    return Ok(block);
                }
                Err(retargeted) => job = retargeted,
            }
        }
    }

    /// Survey every registered peer and adopt the longest valid chain.
    pub async fn resolve_conflicts(&self) -> Resolution {
        let outcome = self
            .resolver
            .resolve(&self.ledger, self.transport.as_ref())
            .await;
        info!(
            "CONSENSUS - surveyed {} peers ({} failed), replaced={}, length={}",
            outcome.surveyed, outcome.failed, outcome.replaced, outcome.length
        );
        outcome
    }

    /// Fire-and-forget fan-out to every registered peer, one task per peer.
    pub fn broadcast(&self, event: Event) -> Vec<JoinHandle<()>> {
        let peers = self.ledger.lock().registry().list();
        let event = Arc::new(event);
        peers
            .into_iter()
            .map(|endpoint| {
                let transport = Arc::clone(&self.transport);
                let event = Arc::clone(&event);
                rt::spawn(async move {
                    if let Err(err) = transport.send_event(&endpoint, &event).await {
                        warn!("BROADCAST - {} to {} failed: {}", event.kind(), endpoint, err);
                    }
                })
            })
            .collect()
    }

    /// Register `own_endpoint` with each of `peers`.
    pub async fn announce(&self, peers: &[String], own_endpoint: &str) {
        for peer in peers {
            match self.transport.register_with(peer, own_endpoint).await {
                Ok(()) => info!("BOOTSTRAP - registered with {}", peer),
                Err(err) => warn!("BOOTSTRAP - could not register with {}: {}", peer, err),
            }
        }
    }
}

/// Drain the event queue one event at a time until every sender is gone.
pub fn spawn_dispatcher(node: Arc<Node>, mut events: EventReceiver) -> JoinHandle<()> {
    rt::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!("EVENT - dispatching {}", event.kind());
            node.handle_event(event).await;
        }
        debug!("EVENT - bus closed, dispatcher exiting");
    })
}

/// Run the resolver every `every`, first run one period after start.
pub fn spawn_consensus_loop(node: Arc<Node>, every: Duration) -> JoinHandle<()> {
    rt::spawn(async move {
        let mut ticker = rt::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            node.resolve_conflicts().await;
        }
    })
}
