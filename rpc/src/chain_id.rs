//! Script chain identifier -> Ethereum numeric chain ID.
//!
//! The numeric ID changed once: blocks at or above
//! [`CHAIN_ID_OFFSET_HEIGHT`] report the base ID shifted by
//! [`CHAIN_ID_OFFSET`], which moved Script mainnet off Ethereum mainnet's `1`.

use sha3::{Digest, Keccak256};

/// First height reporting the offset chain ID.
pub const CHAIN_ID_OFFSET_HEIGHT: u64 = 2_500_000;

pub const CHAIN_ID_OFFSET: u64 = 360;

/// Map a native chain identifier at a finalized height to the Ethereum chain ID.
pub fn map_chain_id(chain_id: &str, height: u64) -> u64 {
    let base = base_chain_id(chain_id);
    if height < CHAIN_ID_OFFSET_HEIGHT {
        base
    } else {
        base + CHAIN_ID_OFFSET
    }
}

fn base_chain_id(chain_id: &str) -> u64 {
    match chain_id {
        "mainnet" => 1,
        "testnet" => 5,
        "privatenet" => 6,
        other => {
            // Custom networks get a stable ID from their name.
            let hash = Keccak256::digest(other.as_bytes());
            let mut tail = [0u8; 4];
            tail.copy_from_slice(&hash[28..32]);
            u32::from_be_bytes(tail) as u64
        }
    }
}

/// Return the chain ID as a hex string with 0x prefix
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}
