use std::time::Duration;

use clap::Parser;
use rand::Rng;

use crate::blockchain::{
    DEFAULT_COINBASE_REWARD, DEFAULT_DIFFICULTY, DEFAULT_MINING_THRESHOLD, DifficultyTarget,
    LedgerParams,
};
use crate::network::{FetchPolicy, RELAY_MEMORY};

/// Node settings, read from the command line with environment (and `.env`) fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "powledger-node", version, about = "Toy proof-of-work ledger node")]
pub struct NodeConfig {
    /// Name shown in every log line.
    #[arg(env = "NODE_NAME")]
    pub name: String,

    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Listening port; a random one in 3000..4000 when unset.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Leading zero hex digits a block hash needs.
    #[arg(long, env = "DIFFICULTY", default_value_t = DEFAULT_DIFFICULTY as u8,
          value_parser = clap::value_parser!(u8).range(1..=16))]
    pub difficulty: u8,

    /// Pending transactions that trigger mining.
    #[arg(long, env = "MINING_THRESHOLD", default_value_t = DEFAULT_MINING_THRESHOLD)]
    pub mining_threshold: usize,

    #[arg(long, env = "COINBASE_REWARD", default_value_t = DEFAULT_COINBASE_REWARD)]
    pub coinbase_reward: u64,

    /// Peers to start with, comma separated.
    #[arg(long, env = "PEERS", value_delimiter = ',')]
    pub peers: Vec<String>,

    /// Endpoint other nodes reach this one at; registered with every
    /// bootstrap peer on startup.
    #[arg(long, env = "ADVERTISE")]
    pub advertise: Option<String>,

    /// Seconds between consensus rounds; 0 disables the background loop.
    #[arg(long, env = "CONSENSUS_INTERVAL_SECS", default_value_t = 30)]
    pub consensus_interval_secs: u64,

    #[arg(long, env = "PEER_TIMEOUT_SECS", default_value_t = 5)]
    pub peer_timeout_secs: u64,

    /// Tries per peer when fetching its chain.
    #[arg(long, env = "PEER_FETCH_ATTEMPTS", default_value_t = 2)]
    pub peer_fetch_attempts: u32,

    /// Drop transactions this node already relayed instead of flooding them again.
    #[arg(long, env = "SUPPRESS_RELAY_LOOPS")]
    pub suppress_relay_loops: bool,
}

impl NodeConfig {
    /// The configured port, or a random one (pick once and keep it).
    pub fn resolve_port(&self) -> u16 {
        self.port
            .unwrap_or_else(|| rand::thread_rng().gen_range(3000..4000))
    }

    pub fn ledger_params(&self, miner_address: String) -> LedgerParams {
        LedgerParams {
            difficulty: DifficultyTarget::with_zeros(usize::from(self.difficulty)),
            mining_threshold: self.mining_threshold.max(1),
            coinbase_reward: self.coinbase_reward,
            miner_address,
        }
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            attempts: self.peer_fetch_attempts.max(1),
            ..FetchPolicy::default()
        }
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs.max(1))
    }

    pub fn consensus_interval(&self) -> Option<Duration> {
        (self.consensus_interval_secs > 0).then(|| Duration::from_secs(self.consensus_interval_secs))
    }

    pub fn relay_memory(&self) -> usize {
        if self.suppress_relay_loops { RELAY_MEMORY } else { 0 }
    }
}
