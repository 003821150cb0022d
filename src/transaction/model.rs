use serde::{Deserialize, Serialize};

use crate::error::{NodeError, Result};

/// A value transfer between two addresses. An empty `input` marks the
/// miner's coinbase reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub input: String,
    pub output: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(input: impl Into<String>, output: impl Into<String>, amount: u64) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            amount,
        }
    }

    /// Reward transaction crediting `miner` with `reward`.
    pub fn coinbase(miner: impl Into<String>, reward: u64) -> Self {
        Self::new(String::new(), miner, reward)
    }

    pub fn is_coinbase(&self) -> bool {
        self.input.is_empty()
    }

    /// Structural checks applied when a transaction enters through the API.
    /// Balances and signatures are not checked: any address may be spent from.
    pub fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(NodeError::InvalidTransaction("input address required"));
        }
        if self.output.trim().is_empty() {
            return Err(NodeError::InvalidTransaction("output address required"));
        }
        if self.amount == 0 {
            return Err(NodeError::InvalidTransaction("amount must be > 0"));
        }
        Ok(())
    }
}
