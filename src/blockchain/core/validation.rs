use crate::account::TOTAL_SUPPLY;
use crate::error::{ErrorKind, IntegrityViolation};
use std::collections::BTreeMap;

use super::chain::{Block, BLOCK_CAPACITY};

/// Checks every sealed block in `blocks`, in block-number order.
///
/// A non-genesis block's `previous_hash` is compared against the hash
/// recomputed from the linked block's stored contents, so editing either a
/// block's contents or its stored hash field is detected.
pub fn validate_chain(blocks: &BTreeMap<u64, Block>) -> Result<(), ErrorKind> {
    for block in blocks.values() {
        validate_block(block, blocks)?;
    }
    Ok(())
}

fn validate_block(block: &Block, blocks: &BTreeMap<u64, Block>) -> Result<(), ErrorKind> {
    let violation = |violation| ErrorKind::ChainIntegrity {
        block: block.number,
        violation,
    };

    if block.transactions.len() != BLOCK_CAPACITY {
        return Err(violation(IntegrityViolation::TransactionCountMismatch {
            expected: BLOCK_CAPACITY,
            found: block.transactions.len(),
        }));
    }

    if !block.is_genesis() {
        let previous = block
            .previous_block
            .and_then(|number| blocks.get(&number))
            .ok_or_else(|| violation(IntegrityViolation::MissingPreviousBlock))?;
        let recomputed = previous.compute_hash();
        if block.previous_hash != recomputed {
            return Err(violation(IntegrityViolation::HashMismatch {
                expected: recomputed,
                found: block.previous_hash.clone(),
            }));
        }
    }

    let total = block.balances.total();
    if total != TOTAL_SUPPLY {
        return Err(violation(IntegrityViolation::BalanceMismatch {
            expected: TOTAL_SUPPLY,
            found: total,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MASTER_ADDRESS;
    use crate::blockchain::Ledger;
    use crate::transaction::Transaction;

    /// Copies of the sealed blocks of a ledger that has sealed `count` blocks.
    fn sealed_chain(count: u64) -> BTreeMap<u64, Block> {
        let mut ledger = Ledger::new("test", "validation", "seed");
        ledger.create_account("alice").unwrap();
        for id in 1..=count * BLOCK_CAPACITY as u64 {
            ledger
                .process_transaction(Transaction::new(id, 5, 10, "", MASTER_ADDRESS, "alice"))
                .unwrap();
        }
        (1..=count)
            .map(|n| (n, ledger.get_block(n).unwrap()))
            .collect()
    }

    #[test]
    fn test_valid_chain_passes() {
        let blocks = sealed_chain(3);
        assert!(validate_chain(&blocks).is_ok());
        assert!(validate_chain(&blocks).is_ok());
    }

    #[test]
    fn test_empty_chain_passes() {
        assert!(validate_chain(&BTreeMap::new()).is_ok());
    }

    #[test]
    fn test_tampered_balance_detected_by_successor() {
        let mut blocks = sealed_chain(2);
        // Moving value between accounts keeps the total, so only the hash
        // link of block 2 can catch it.
        let b1 = blocks.get_mut(&1).unwrap();
        b1.balances.debit(MASTER_ADDRESS, 1).unwrap();
        b1.balances.credit("alice", 1).unwrap();

        let err = validate_chain(&blocks).unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::ChainIntegrity {
                block: 2,
                violation: IntegrityViolation::HashMismatch { .. }
            }
        ));
    }

    #[test]
    fn test_tampered_stored_hash_field_detected() {
        let mut blocks = sealed_chain(2);
        blocks.get_mut(&2).unwrap().previous_hash = "0".repeat(64);
        let err = validate_chain(&blocks).unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::ChainIntegrity {
                block: 2,
                violation: IntegrityViolation::HashMismatch { .. }
            }
        ));
    }

    #[test]
    fn test_overwriting_sealed_hash_alone_is_harmless() {
        let mut blocks = sealed_chain(2);
        blocks.get_mut(&1).unwrap().hash = "forged".to_string();
        assert!(validate_chain(&blocks).is_ok());
    }

    #[test]
    fn test_missing_transaction_detected() {
        let mut blocks = sealed_chain(1);
        blocks.get_mut(&1).unwrap().transactions.pop();
        assert!(matches!(
            validate_chain(&blocks),
            Err(ErrorKind::ChainIntegrity {
                block: 1,
                violation: IntegrityViolation::TransactionCountMismatch { expected: 10, found: 9 }
            })
        ));
    }

    #[test]
    fn test_minted_balance_detected() {
        let mut blocks = sealed_chain(1);
        blocks.get_mut(&1).unwrap().balances.credit("alice", 1).unwrap();
        assert!(matches!(
            validate_chain(&blocks),
            Err(ErrorKind::ChainIntegrity {
                block: 1,
                violation: IntegrityViolation::BalanceMismatch { .. }
            })
        ));
    }

    #[test]
    fn test_missing_previous_block_detected() {
        let mut blocks = sealed_chain(2);
        blocks.remove(&1);
        assert!(matches!(
            validate_chain(&blocks),
            Err(ErrorKind::ChainIntegrity {
                block: 2,
                violation: IntegrityViolation::MissingPreviousBlock
            })
        ));
    }
}
