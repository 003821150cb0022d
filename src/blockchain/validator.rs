use log::debug;

use super::Block;

/// A block is valid on top of `previous` when it links to the predecessor's
/// hash and its own header satisfies its own difficulty target.
pub fn is_block_valid(block: &Block, previous: &Block) -> bool {
    let expected = previous.hash();
    if block.header.previous_block_hash != expected {
        debug!(
            "VALIDATE - broken link: expected {}, got {}",
            expected, block.header.previous_block_hash
        );
        return false;
    }
    if !block.header.meets_difficulty() {
        debug!(
            "VALIDATE - header hash {} misses target {}",
            block.header.hash(),
            block.header.difficulty
        );
        return false;
    }
    true
}

/// Genesis is trusted; every later block must be valid on its predecessor.
pub fn is_chain_valid(chain: &[Block]) -> bool {
    chain
        .windows(2)
        .all(|pair| is_block_valid(&pair[1], &pair[0]))
}

#[cfg(test)]
mod tests {
    use super::{is_block_valid, is_chain_valid};
    use crate::blockchain::{Block, DifficultyTarget, pow};
    use crate::transaction::Transaction;

    fn build_chain(blocks: usize) -> Vec<Block> {
        let target = DifficultyTarget::with_zeros(2);
        let mut chain = vec![Block::genesis(target.clone())];
        for i in 0..blocks {
            let prev = chain.last().unwrap().hash();
            chain.push(Block {
                header: pow::mine(&prev, &target),
                transactions: vec![
                    Transaction::coinbase("miner", 1),
                    Transaction::new("alice", "bob", i as u64 + 1),
                ],
            });
        }
        chain
    }

    #[test]
    fn mined_chain_is_valid() {
        assert!(is_chain_valid(&build_chain(4)));
    }

    #[test]
    fn genesis_only_and_empty_are_valid() {
        assert!(is_chain_valid(&build_chain(0)));
        assert!(is_chain_valid(&[]));
    }

    #[test]
    fn tampered_transactions_break_the_next_link() {
        let mut chain = build_chain(3);
        chain[1].transactions[1].amount = 999;
        assert!(!is_chain_valid(&chain));
    }

    #[test]
    fn wrong_previous_hash_is_rejected() {
        let chain = build_chain(2);
        let mut forged = chain[2].clone();
        forged.header.previous_block_hash = chain[0].hash();
        assert!(!is_block_valid(&forged, &chain[1]));
    }

    #[test]
    fn insufficient_work_is_rejected() {
        let chain = build_chain(1);
        let mut block = chain[1].clone();
        // Raise the claimed target far above what the nonce was mined for.
        block.header.difficulty = DifficultyTarget::with_zeros(40);
        assert!(!is_block_valid(&block, &chain[0]));
    }
}
