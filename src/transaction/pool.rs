use std::mem;

use super::Transaction;

/// Transactions waiting to be included in the next mined block.
#[derive(Debug, Default, Clone)]
pub struct TransactionPool {
    pending: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append without validation. Returns the pool size after the insert.
    pub fn submit(&mut self, tx: Transaction) -> usize {
        self.pending.push(tx);
        self.pending.len()
    }

    /// Take everything pending, leaving the pool empty.
    pub fn drain(&mut self) -> Vec<Transaction> {
        mem::take(&mut self.pending)
    }

    /// Put transactions back at the front, ahead of anything that arrived since.
    pub fn restore(&mut self, mut txs: Vec<Transaction>) {
        txs.append(&mut self.pending);
        self.pending = txs;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.pending.iter()
    }
}
