use chrono::Utc;
use log::debug;

use super::{BlockHeader, DifficultyTarget};

/// Search for a header on top of `previous_block_hash` whose hash satisfies
/// `difficulty`. Each attempt takes a fresh timestamp, so results are not
/// reproducible. Unbounded and CPU-bound: callers on an async runtime must
/// move it to a blocking thread.
pub fn mine(previous_block_hash: &str, difficulty: &DifficultyTarget) -> BlockHeader {
    let mut nonce: u64 = 0;
    loop {
        let header = BlockHeader {
            nonce,
            timestamp: Utc::now().timestamp_millis(),
            previous_block_hash: previous_block_hash.to_string(),
            difficulty: difficulty.clone(),
        };
        if header.meets_difficulty() {
            debug!(
                "POW - found nonce {} for difficulty {} (prev={})",
                nonce, difficulty, previous_block_hash
            );
            return header;
        }
        nonce = nonce.wrapping_add(1);
    }
}
