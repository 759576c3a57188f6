use ethereum_types::H256;

use super::types::{EthLog, EthReceipt};
use super::{hex_data, non_zero, quantity, zero_bloom};
use crate::reconcile::TxPosition;
use crate::script::{NativeLog, NativeReceipt, TransactionLookup};

/// Identifies the transaction a log was emitted by.
#[derive(Debug, Clone, Copy)]
pub struct LogOrigin {
    pub block_hash: H256,
    pub block_number: u64,
    pub transaction_hash: H256,
    pub transaction_index: u64,
}

/// Translate one native log. The block-wide index comes from the reconciler.
pub fn translate_log(log: &NativeLog, origin: &LogOrigin, log_index: u64) -> EthLog {
    EthLog {
        address: log.address,
        topics: log.topics.clone(),
        data: hex_data(&log.data),
        block_number: quantity(origin.block_number),
        transaction_hash: origin.transaction_hash,
        transaction_index: quantity(origin.transaction_index),
        block_hash: origin.block_hash,
        log_index: quantity(log_index),
        removed: false,
    }
}

/// Translate the receipt of a finalized transaction placed at `position`.
pub fn translate_receipt(
    lookup: &TransactionLookup,
    receipt: &NativeReceipt,
    position: &TxPosition,
) -> EthReceipt {
    let origin = LogOrigin {
        block_hash: lookup.block_hash,
        block_number: lookup.block_height,
        transaction_hash: lookup.hash,
        transaction_index: position.transaction_index,
    };
    let (from, to) = lookup.transaction.parties().unwrap_or_default();

    let logs = receipt
        .logs
        .iter()
        .enumerate()
        .map(|(n, log)| translate_log(log, &origin, position.log_index(n)))
        .collect();

    EthReceipt {
        transaction_hash: lookup.hash,
        transaction_index: quantity(position.transaction_index),
        block_hash: lookup.block_hash,
        block_number: quantity(lookup.block_height),
        from,
        to: non_zero(to),
        cumulative_gas_used: quantity(position.cumulative_gas_used),
        gas_used: quantity(receipt.gas_used),
        contract_address: non_zero(receipt.contract_address),
        logs,
        logs_bloom: zero_bloom(),
        status: quantity(receipt.evm_err.is_empty() as u64),
        tx_type: quantity(0),
    }
}
