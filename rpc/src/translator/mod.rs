pub mod block;
pub mod receipt;
pub mod tx;
pub mod types;

use ethereum_types::{H160, H256};
use num_bigint::BigUint;

pub use block::translate_block;
pub use receipt::{translate_log, translate_receipt, LogOrigin};
pub use tx::{
    eth_tx_hash, eth_tx_preimage, split_signature, translate_contract_transaction,
    translate_indexed_transaction, translate_native_transaction, translate_send_transaction,
    Signature, TxContext,
};
pub use types::{BlockTransactions, EthBlock, EthLog, EthReceipt, EthSyncing, EthTransaction};

/// SHA3 of the RLP encoding of an empty uncle list.
pub const EMPTY_UNCLES_HASH: H256 = H256([
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a, 0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13, 0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
]);

/// Root hash of an empty Merkle-Patricia trie.
pub const EMPTY_TRIE_ROOT: H256 = H256([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
]);

pub const NONCE_PLACEHOLDER: &str = "0x0000000000000000";

/// Size reported for every block; the native API does not expose one.
pub const BLOCK_SIZE_PLACEHOLDER: u64 = 1000;

/// All-zero 256-byte logs bloom.
pub fn zero_bloom() -> String {
    format!("0x{}", "0".repeat(512))
}

/// Hex quantity with no leading zeros ("0x0" for zero).
pub fn quantity(value: u64) -> String {
    format!("0x{:x}", value)
}

pub fn big_quantity(value: &BigUint) -> String {
    format!("0x{}", value.to_str_radix(16))
}

/// The zero address stands for "none" in native records.
pub fn non_zero(addr: H160) -> Option<H160> {
    if addr.is_zero() {
        None
    } else {
        Some(addr)
    }
}

/// Unformatted data: 0x followed by two hex digits per byte.
pub fn hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
