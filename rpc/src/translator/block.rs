use ethereum_types::H256;
use tracing::debug;

use super::tx::{translate_contract_transaction, TxContext};
use super::types::{BlockTransactions, EthBlock};
use super::{
    hex_data, quantity, zero_bloom, BLOCK_SIZE_PLACEHOLDER, EMPTY_TRIE_ROOT, EMPTY_UNCLES_HASH,
    NONCE_PLACEHOLDER,
};
use crate::script::{NativeBlock, NativeTransaction};

/// Translate a native block into an Ethereum block object.
///
/// Only contract transactions are listed, either as full objects or as their
/// native hashes. Gas limit comes from configuration, not from the block.
pub fn translate_block(block: &NativeBlock, full: bool, chain_id: u64, gas_limit: u64) -> EthBlock {
    let contract_txs = block
        .transactions
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match &entry.transaction {
            NativeTransaction::SmartContract(tx) => Some((index, entry, tx)),
            _ => None,
        });

    let gas_used = block
        .transactions
        .iter()
        .filter(|entry| matches!(entry.transaction, NativeTransaction::SmartContract(_)))
        .filter_map(|entry| entry.receipt.as_ref())
        .fold(0u64, |acc, receipt| acc.saturating_add(receipt.gas_used));

    let transactions = if full {
        BlockTransactions::Full(
            contract_txs
                .map(|(index, _, tx)| {
                    let ctx = TxContext {
                        hash: None,
                        block_hash: Some(block.hash),
                        block_number: Some(block.height),
                        transaction_index: Some(index as u64),
                        chain_id,
                    };
                    translate_contract_transaction(tx, &ctx)
                })
                .collect(),
        )
    } else {
        BlockTransactions::Hashes(contract_txs.map(|(_, entry, _)| entry.hash).collect())
    };

    debug!(
        "Translated block: height={}, native_txs={}, listed={}",
        block.height,
        block.transactions.len(),
        transactions.len()
    );

    EthBlock {
        number: quantity(block.height),
        hash: block.hash,
        parent_hash: block.parent,
        nonce: NONCE_PLACEHOLDER.to_string(),
        sha3_uncles: EMPTY_UNCLES_HASH,
        logs_bloom: zero_bloom(),
        transactions_root: block.transactions_hash,
        state_root: block.state_hash,
        receipts_root: EMPTY_TRIE_ROOT,
        miner: block.proposer,
        difficulty: quantity(0),
        total_difficulty: quantity(0),
        extra_data: hex_data(&[]),
        size: quantity(BLOCK_SIZE_PLACEHOLDER),
        gas_limit: quantity(gas_limit),
        gas_used: quantity(gas_used),
        timestamp: quantity(block.timestamp),
        transactions,
        uncles: Vec::new(),
        mix_hash: H256::zero(),
    }
}
