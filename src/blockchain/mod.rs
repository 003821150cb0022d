pub mod block;
pub mod ledger;
pub mod pow;
pub mod validator;

pub use block::{Block, BlockHeader, DifficultyTarget};
pub use ledger::{Ledger, LedgerParams, MiningJob};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Pending transactions that trigger mining.
pub const DEFAULT_MINING_THRESHOLD: usize = 2;

/// Coinbase amount credited to the miner of each block.
pub const DEFAULT_COINBASE_REWARD: u64 = 1;

/// Genesis header timestamp (epoch millis), identical on every node.
pub const GENESIS_TIMESTAMP_MS: i64 = 1_700_000_000_000;

pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";
