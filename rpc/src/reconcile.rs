use ethereum_types::H256;

use crate::error::AdaptorError;
use crate::script::{BlockTransaction, TxKind};

/// Where a transaction sits within its block, as the Ethereum receipt reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxPosition {
    /// Position in the native transaction list; every kind is counted.
    pub transaction_index: u64,
    /// Gas of every contract transaction up to and including the target.
    pub cumulative_gas_used: u64,
    /// Index assigned to the target's first log.
    pub first_log_index: u64,
}

impl TxPosition {
    /// Block-wide index of the target's `n`th log.
    pub fn log_index(&self, n: usize) -> u64 {
        self.first_log_index.saturating_add(n as u64)
    }
}

/// Locate `target` in a block's ordered transaction list.
///
/// Only contract transactions carry receipts, so only they contribute gas
/// and logs. Non-contract transactions still occupy an index.
pub fn reconcile(transactions: &[BlockTransaction], target: H256) -> Result<TxPosition, AdaptorError> {
    let mut cumulative_gas_used: u64 = 0;
    let mut first_log_index: u64 = 0;

    for (index, tx) in transactions.iter().enumerate() {
        let (gas_used, log_count) = match (&tx.kind, &tx.receipt) {
            (TxKind::SmartContract, Some(receipt)) => (receipt.gas_used, receipt.logs.len() as u64),
            _ => (0, 0),
        };
        cumulative_gas_used = cumulative_gas_used.saturating_add(gas_used);

        if tx.hash == target {
            return Ok(TxPosition {
                transaction_index: index as u64,
                cumulative_gas_used,
                first_log_index,
            });
        }
        first_log_index = first_log_index.saturating_add(log_count);
    }

    Err(AdaptorError::TransactionNotFound(target))
}
