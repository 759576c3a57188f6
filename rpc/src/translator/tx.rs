use ethereum_types::{H160, H256};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use rlp::RlpStream;
use sha3::{Digest, Keccak256};
use tracing::warn;

use super::types::EthTransaction;
use super::{big_quantity, hex_data, non_zero, quantity};
use crate::error::AdaptorError;
use crate::script::sctx::rlp_uint;
use crate::script::{NativeBlock, NativeTransaction, SendTx, SmartContractTx, TxKind};

/// Block-level facts a transaction object carries alongside its own fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxContext {
    /// Hash to expose. `None` recomputes the Ethereum-style hash.
    pub hash: Option<H256>,
    pub block_hash: Option<H256>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub chain_id: u64,
}

impl TxContext {
    /// Context for a transaction at `index` in `block`, exposing its native hash.
    pub fn in_block(block: &NativeBlock, index: usize, chain_id: u64) -> Self {
        Self {
            hash: block.transactions.get(index).map(|tx| tx.hash),
            block_hash: Some(block.hash),
            block_number: Some(block.height),
            transaction_index: Some(index as u64),
            chain_id,
        }
    }
}

/// (v, r, s) decomposed from a 65-byte `r || s || recovery id` signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    pub v: u64,
    pub r: H256,
    pub s: H256,
}

/// Split native signature bytes into Ethereum's (v, r, s).
/// Signatures shorter than 65 bytes decompose to zeros.
pub fn split_signature(sig: &[u8]) -> Signature {
    if sig.len() < 65 {
        return Signature::default();
    }
    Signature {
        r: H256::from_slice(&sig[0..32]),
        s: H256::from_slice(&sig[32..64]),
        v: sig[64] as u64 + 27,
    }
}

/// Native sequence numbers start at 1, Ethereum nonces at 0.
fn nonce_from_sequence(sequence: u64) -> u64 {
    if sequence == 0 {
        warn!("Native sequence 0 has no Ethereum nonce, reporting 0");
    }
    sequence.saturating_sub(1)
}

/// RLP of the EIP-155 signing payload
/// `[nonce, gasPrice, gas, to, value, data, chainId, 0, 0]`.
pub fn eth_tx_preimage(
    nonce: u64,
    gas_price: &BigUint,
    gas_limit: u64,
    to: Option<H160>,
    value: &BigUint,
    data: &[u8],
    chain_id: u64,
) -> Vec<u8> {
    let mut stream = RlpStream::new_list(9);
    stream.append(&nonce);
    stream.append(&rlp_uint(gas_price));
    stream.append(&gas_limit);
    stream.append(&to.map(|addr| addr.as_bytes().to_vec()).unwrap_or_default());
    stream.append(&rlp_uint(value));
    stream.append(&data.to_vec());
    stream.append(&chain_id);
    stream.append(&0u64);
    stream.append(&0u64);
    stream.out().to_vec()
}

/// Keccak-256 of [`eth_tx_preimage`].
pub fn eth_tx_hash(
    nonce: u64,
    gas_price: &BigUint,
    gas_limit: u64,
    to: Option<H160>,
    value: &BigUint,
    data: &[u8],
    chain_id: u64,
) -> H256 {
    let preimage = eth_tx_preimage(nonce, gas_price, gas_limit, to, value, data, chain_id);
    H256::from_slice(&Keccak256::digest(&preimage))
}

/// Translate a contract-invocation transaction.
/// A zero recipient means contract creation and is reported as `to: null`.
pub fn translate_contract_transaction(tx: &SmartContractTx, ctx: &TxContext) -> EthTransaction {
    let nonce = nonce_from_sequence(tx.from.sequence);
    let to = non_zero(tx.to.address);
    let value = &tx.from.coins.spaywei;
    let hash = ctx.hash.unwrap_or_else(|| {
        eth_tx_hash(nonce, &tx.gas_price, tx.gas_limit, to, value, &tx.data, ctx.chain_id)
    });
    let sig = split_signature(&tx.from.signature);

    EthTransaction {
        hash,
        nonce: quantity(nonce),
        block_hash: ctx.block_hash,
        block_number: ctx.block_number.map(quantity),
        transaction_index: ctx.transaction_index.map(quantity),
        from: tx.from.address,
        to,
        value: big_quantity(value),
        gas_price: big_quantity(&tx.gas_price),
        gas: quantity(tx.gas_limit),
        input: hex_data(&tx.data),
        v: quantity(sig.v),
        r: sig.r,
        s: sig.s,
        tx_type: quantity(0),
        chain_id: Some(quantity(ctx.chain_id)),
    }
}

/// Translate a value transfer. The first input and output name the parties
/// and the fee stands in for gas.
pub fn translate_send_transaction(tx: &SendTx, ctx: &TxContext) -> EthTransaction {
    let input = tx.inputs.first().cloned().unwrap_or_default();
    let to = tx.outputs.first().and_then(|output| non_zero(output.address));
    let nonce = nonce_from_sequence(input.sequence);
    let gas = tx.fee.spaywei.to_u64().unwrap_or(u64::MAX);
    let value = &input.coins.spaywei;
    let hash = ctx.hash.unwrap_or_else(|| {
        eth_tx_hash(nonce, &BigUint::zero(), gas, to, value, &[], ctx.chain_id)
    });
    let sig = split_signature(&input.signature);

    EthTransaction {
        hash,
        nonce: quantity(nonce),
        block_hash: ctx.block_hash,
        block_number: ctx.block_number.map(quantity),
        transaction_index: ctx.transaction_index.map(quantity),
        from: input.address,
        to,
        value: big_quantity(value),
        gas_price: quantity(0),
        gas: quantity(gas),
        input: hex_data(&[]),
        v: quantity(sig.v),
        r: sig.r,
        s: sig.s,
        tx_type: quantity(0),
        chain_id: Some(quantity(ctx.chain_id)),
    }
}

/// Kinds with no Ethereum counterpart only get their positional fields.
fn positional_transaction(ctx: &TxContext) -> EthTransaction {
    EthTransaction {
        hash: ctx.hash.unwrap_or_default(),
        nonce: quantity(0),
        block_hash: ctx.block_hash,
        block_number: ctx.block_number.map(quantity),
        transaction_index: ctx.transaction_index.map(quantity),
        from: H160::zero(),
        to: None,
        value: quantity(0),
        gas_price: quantity(0),
        gas: quantity(0),
        input: hex_data(&[]),
        v: quantity(0),
        r: H256::zero(),
        s: H256::zero(),
        tx_type: quantity(0),
        chain_id: None,
    }
}

pub fn translate_native_transaction(tx: &NativeTransaction, ctx: &TxContext) -> EthTransaction {
    match tx {
        NativeTransaction::SmartContract(sc) => translate_contract_transaction(sc, ctx),
        NativeTransaction::Send(send) => translate_send_transaction(send, ctx),
        NativeTransaction::Other(_) => positional_transaction(ctx),
    }
}

/// Transaction at `index` of the block's native list, counting every kind.
pub fn translate_indexed_transaction(
    block: &NativeBlock,
    index: u64,
    chain_id: u64,
) -> Result<EthTransaction, AdaptorError> {
    let count = block.transactions.len();
    let position = usize::try_from(index)
        .ok()
        .filter(|&i| i < count)
        .ok_or(AdaptorError::IndexOutOfRange { index, count })?;

    let entry = &block.transactions[position];
    let ctx = TxContext::in_block(block, position, chain_id);
    if let TxKind::Other(tag) = entry.kind {
        warn!("Transaction {:?} has unsupported kind {}", entry.hash, tag);
    }
    Ok(translate_native_transaction(&entry.transaction, &ctx))
}
