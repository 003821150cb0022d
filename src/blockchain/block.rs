use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP_MS};
use crate::transaction::Transaction;

/// Proof-of-work target: a non-empty run of `'0'` characters. A hash satisfies
/// it when the hash starts with the target, i.e. has at least `len` leading
/// zero hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DifficultyTarget(String);

impl DifficultyTarget {
    /// Target requiring `width` leading zero hex digits.
    pub fn with_zeros(width: usize) -> Self {
        Self("0".repeat(width))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_satisfied_by(&self, hash: &str) -> bool {
        !self.0.is_empty() && hash.starts_with(self.0.as_str())
    }
}

impl TryFrom<String> for DifficultyTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err("difficulty target must not be empty".to_string());
        }
        if value.chars().all(|c| c == '0') {
            Ok(Self(value))
        } else {
            Err(format!("difficulty target must only contain '0', got {value:?}"))
        }
    }
}

impl From<DifficultyTarget> for String {
    fn from(target: DifficultyTarget) -> Self {
        target.0
    }
}

impl fmt::Display for DifficultyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Header sealed by proof of work. Field order is the canonical hashing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub nonce: u64,
    pub timestamp: i64, // epoch millis (UTC)
    pub previous_block_hash: String,
    pub difficulty: DifficultyTarget,
}

impl BlockHeader {
    /// SHA-256 over the compact JSON form, lowercase hex.
    /// This is the hash proof of work is checked against.
    pub fn hash(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("block header serializes to JSON");
        sha256_hex(&bytes)
    }

    pub fn meets_difficulty(&self) -> bool {
        self.difficulty.is_satisfied_by(&self.hash())
    }
}

/// A sealed header plus the transactions it carries (coinbase first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// First block of every chain. Not mined and never validated.
    pub fn genesis(difficulty: DifficultyTarget) -> Self {
        Self {
            header: BlockHeader {
                nonce: 0,
                timestamp: GENESIS_TIMESTAMP_MS,
                previous_block_hash: GENESIS_PREVIOUS_HASH.to_string(),
                difficulty,
            },
            transactions: Vec::new(),
        }
    }

    /// Link hash over the whole block (header and transactions); the
    /// successor stores it as `previous_block_hash`.
    pub fn hash(&self) -> String {
        let bytes = serde_json::to_vec(self).expect("block serializes to JSON");
        sha256_hex(&bytes)
    }

    pub fn coinbase_count(&self) -> usize {
        self.transactions.iter().filter(|t| t.is_coinbase()).count()
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
