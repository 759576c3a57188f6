use ethereum_types::{H160, H256};
use serde::Serialize;

/// EVM-formatted block object.
/// Maps a Script block to the Ethereum block format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthBlock {
    /// Block number (native height)
    pub number: String,
    pub hash: H256,
    pub parent_hash: H256,
    /// Fixed placeholder; the native chain has no PoW nonce
    pub nonce: String,
    /// SHA3 of the empty uncle list
    pub sha3_uncles: H256,
    /// Logs bloom filter (always zero)
    pub logs_bloom: String,
    pub transactions_root: H256,
    pub state_root: H256,
    /// Receipts root (native blocks carry none; empty trie root)
    pub receipts_root: H256,
    /// Block proposer
    pub miner: H160,
    pub difficulty: String,
    pub total_difficulty: String,
    pub extra_data: String,
    pub size: String,
    /// Gas limit (static, from configuration)
    pub gas_limit: String,
    pub gas_used: String,
    pub timestamp: String,
    pub transactions: BlockTransactions,
    /// Uncle blocks (always empty)
    pub uncles: Vec<H256>,
    pub mix_hash: H256,
}

/// Transaction list of a block: hashes only, or full objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    Hashes(Vec<H256>),
    Full(Vec<EthTransaction>),
}

impl BlockTransactions {
    pub fn len(&self) -> usize {
        match self {
            BlockTransactions::Hashes(hashes) => hashes.len(),
            BlockTransactions::Full(txs) => txs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// EVM-formatted transaction object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTransaction {
    pub hash: H256,
    pub nonce: String,
    pub block_hash: Option<H256>,
    pub block_number: Option<String>,
    pub transaction_index: Option<String>,
    pub from: H160,
    /// None for contract creation
    pub to: Option<H160>,
    pub value: String,
    pub gas_price: String,
    pub gas: String,
    pub input: String,
    pub v: String,
    pub r: H256,
    pub s: H256,
    #[serde(rename = "type")]
    pub tx_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

/// EVM-formatted transaction receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthReceipt {
    pub transaction_hash: H256,
    pub transaction_index: String,
    pub block_hash: H256,
    pub block_number: String,
    pub from: H160,
    pub to: Option<H160>,
    pub cumulative_gas_used: String,
    pub gas_used: String,
    pub contract_address: Option<H160>,
    pub logs: Vec<EthLog>,
    pub logs_bloom: String,
    /// 0x1 for success, 0x0 for an execution error
    pub status: String,
    #[serde(rename = "type")]
    pub tx_type: String,
}

/// EVM-formatted log entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthLog {
    pub address: H160,
    pub topics: Vec<H256>,
    pub data: String,
    pub block_number: String,
    pub transaction_hash: H256,
    pub transaction_index: String,
    pub block_hash: H256,
    pub log_index: String,
    pub removed: bool,
}

/// Progress object returned by eth_syncing while the node catches up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EthSyncing {
    pub starting_block: String,
    pub current_block: String,
    pub highest_block: String,
    pub pulled_states: String,
    pub known_states: String,
}
