use log::{debug, info, warn};

use super::{Block, BlockHeader, DifficultyTarget, pow, validator};
use crate::network::NodeRegistry;
use crate::transaction::{Transaction, TransactionPool};

/// Knobs fixed for the life of a ledger.
#[derive(Debug, Clone)]
pub struct LedgerParams {
    pub difficulty: DifficultyTarget,
    pub mining_threshold: usize,
    pub coinbase_reward: u64,
    /// Coinbase `output`: the miner's public identity.
    pub miner_address: String,
}

/// Everything needed to search for a block without holding the ledger.
#[derive(Debug, Clone)]
pub struct MiningJob {
    pub previous_block_hash: String,
    pub difficulty: DifficultyTarget,
    /// Reward for this node; goes in front of `transactions` when sealed.
    pub coinbase: Transaction,
    /// Drained from the pool, in submission order.
    pub transactions: Vec<Transaction>,
}

/// In-memory chain owner: the canonical chain, pending transactions and
/// known peers.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pool: TransactionPool,
    registry: NodeRegistry,
    params: LedgerParams,
}

impl Ledger {
    /// Start a ledger holding only the genesis block.
    pub fn new(params: LedgerParams) -> Self {
        Self {
            chain: vec![Block::genesis(params.difficulty.clone())],
            pool: TransactionPool::new(),
            registry: NodeRegistry::new(),
            params,
        }
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Owned copy of the chain for handing to readers outside the lock.
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.clone()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    pub fn difficulty(&self) -> &DifficultyTarget {
        &self.params.difficulty
    }

    pub fn pool(&self) -> &TransactionPool {
        &self.pool
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    /// Add to the pool; true when the pool has reached the mining threshold.
    pub fn accept_transaction(&mut self, tx: Transaction) -> bool {
        let size = self.pool.submit(tx);
        debug!("LEDGER - pool size now {}", size);
        size >= self.params.mining_threshold
    }

    /// Add to the pool and mine one block right here once the threshold is reached.
    pub fn receive_transaction(&mut self, tx: Transaction) -> Option<Block> {
        if self.accept_transaction(tx) {
            Some(self.mine())
        } else {
            None
        }
    }

    /// Drain the pool into a job with exactly one coinbase in front.
    pub fn prepare_mining(&mut self) -> MiningJob {
        MiningJob {
            previous_block_hash: self.last_block().hash(),
            difficulty: self.params.difficulty.clone(),
            coinbase: Transaction::coinbase(
                self.params.miner_address.clone(),
                self.params.coinbase_reward,
            ),
            transactions: self.pool.drain(),
        }
    }

    /// Append the block sealed for `job`. If the tip moved while the job was
    /// being mined, the job comes back pointed at the current tip.
    pub fn commit_mined(&mut self, job: MiningJob, header: BlockHeader) -> Result<Block, MiningJob> {
        let tip = self.last_block().hash();
        if header.previous_block_hash != tip || job.previous_block_hash != tip {
            warn!(
                "LEDGER - tip moved while mining ({} -> {}), retargeting",
                job.previous_block_hash, tip
            );
            return Err(MiningJob {
                previous_block_hash: tip,
                difficulty: self.params.difficulty.clone(),
                ..job
            });
        }

        let mut transactions = Vec::with_capacity(job.transactions.len() + 1);
        transactions.push(job.coinbase);
        transactions.extend(job.transactions);
        let block = Block {
            header,
            transactions,
        };
        self.chain.push(block.clone());
        info!(
            "LEDGER - appended block #{} ({} txs, nonce={})",
            self.chain.len() - 1,
            block.transactions.len(),
            block.header.nonce
        );
        Ok(block)
    }

    /// Give a job's pool transactions back; its coinbase is dropped.
    pub fn abandon_job(&mut self, job: MiningJob) {
        self.pool.restore(job.transactions);
    }

    /// Mine one block from whatever is pending, synchronously.
    pub fn mine(&mut self) -> Block {
        let mut job = self.prepare_mining();
        loop {
            let header = pow::mine(&job.previous_block_hash, &job.difficulty);
            match self.commit_mined(job, header) {
                Ok(block) => return block,
                Err(retargeted) => job = retargeted,
            }
        }
    }

    /// Check an announced block against the local tip. Never changes the chain.
    pub fn receive_block_announcement(&self, block: &Block) -> bool {
        let valid = validator::is_block_valid(block, self.last_block());
        if valid {
            info!("LEDGER - announced block extends local tip");
        } else {
            debug!("LEDGER - announced block does not extend local tip");
        }
        valid
    }

    /// Swap in `candidate` if it is strictly longer and valid from genesis.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() {
            return false;
        }
        if !validator::is_chain_valid(&candidate) {
            return false;
        }
        info!(
            "LEDGER - replacing chain: {} -> {} blocks",
            self.chain.len(),
            candidate.len()
        );
        self.chain = candidate;
        true
    }

    pub fn is_valid(&self) -> bool {
        validator::is_chain_valid(&self.chain)
    }
}
