use ethereum_types::H256;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::params::{
    block_tag_param, bool_param, call_param, hash_param, parse_big_quantity, parse_quantity, str_param,
    BlockTag,
};
use crate::chain_id::{chain_id_hex, map_chain_id};
use crate::config::Config;
use crate::error::AdaptorError;
use crate::poller::{FinalizationPoller, CODE_FINALIZATION_ATTEMPTS, RECEIPT_FINALIZATION_ATTEMPTS};
use crate::reconcile::reconcile;
use crate::script::types::{CodeResult, Coins, StatusResult, TxInput, TxOutput};
use crate::script::{
    NativeBlock, NativeTransaction, ScriptApi, ScriptRpc, SmartContractTx, TransactionLookup, TxStatus,
};
use crate::translator::{
    big_quantity, quantity, translate_block, translate_indexed_transaction,
    translate_native_transaction, translate_receipt, EthSyncing, TxContext,
};

/// Result type shared by every eth_* handler.
pub type MethodResult = Result<Value, AdaptorError>;

/// Gas price of a simulated call that names none, in SPAY wei.
pub const DEFAULT_GAS_PRICE_WEI: u64 = 4_000_000_000_000;

fn chain_id_of(status: &StatusResult) -> u64 {
    map_chain_id(&status.chain_id, status.latest_finalized_block_height)
}

/// Fetch the block a tag names, with the chain ID current at the latest
/// finalized height.
async fn block_by_tag<C: ScriptRpc + ?Sized>(
    client: &C,
    tag: BlockTag,
) -> Result<(NativeBlock, u64), AdaptorError> {
    let status = client.get_status().await?;
    let height = match tag {
        BlockTag::Latest => status.latest_finalized_block_height,
        BlockTag::Earliest => 0,
        BlockTag::Number(height) => height,
    };
    let block = client.get_block_by_height(height).await?;
    Ok((block, chain_id_of(&status)))
}

async fn block_by_hash<C: ScriptRpc + ?Sized>(
    client: &C,
    hash: H256,
) -> Result<(NativeBlock, u64), AdaptorError> {
    let status = client.get_status().await?;
    let block = client.get_block(hash).await?;
    Ok((block, chain_id_of(&status)))
}

fn contract_tx_count(block: &NativeBlock) -> usize {
    block
        .transactions
        .iter()
        .filter(|tx| matches!(tx.transaction, NativeTransaction::SmartContract(_)))
        .count()
}

/// Handler for eth_chainId
pub async fn chain_id<C: ScriptRpc + ?Sized>(client: &C) -> MethodResult {
    let status = client.get_status().await?;
    let id = chain_id_hex(chain_id_of(&status));
    debug!("eth_chainId -> {} (chain {:?})", id, status.chain_id);
    Ok(Value::String(id))
}

/// Handler for eth_blockNumber
pub async fn block_number<C: ScriptRpc + ?Sized>(client: &C) -> MethodResult {
    let status = client.get_status().await?;
    let hex = quantity(status.latest_finalized_block_height);
    debug!("eth_blockNumber -> {}", hex);
    Ok(Value::String(hex))
}

/// Handler for eth_syncing
pub async fn syncing<C: ScriptRpc + ?Sized>(client: &C) -> MethodResult {
    let status = client.get_status().await?;
    if !status.syncing {
        return Ok(Value::Bool(false));
    }
    let current = quantity(status.current_height);
    let progress = EthSyncing {
        starting_block: quantity(1),
        current_block: current.clone(),
        highest_block: quantity(status.latest_finalized_block_height),
        pulled_states: current.clone(),
        known_states: current,
    };
    debug!("eth_syncing -> {:?}", progress);
    Ok(serde_json::to_value(&progress)?)
}

/// Handler for eth_protocolVersion
pub async fn protocol_version<C: ScriptRpc + ?Sized>(client: &C) -> MethodResult {
    let version = client.get_version().await?;
    Ok(Value::String(version.version))
}

/// Handler for eth_accounts. The adaptor holds no keys.
pub async fn accounts() -> MethodResult {
    Ok(Value::Array(Vec::new()))
}

/// Handler for eth_getBalance
///
/// Any lookup failure reports a zero balance, so unknown accounts look
/// empty instead of erroring.
pub async fn get_balance<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let address = str_param(params, 0, "address")?;
    let tag = block_tag_param(params, 1)?;

    let balance = match client.get_account(address, tag.account_height(), false).await {
        Ok(account) => big_quantity(&account.coins.spaywei),
        Err(e) => {
            warn!("eth_getBalance: lookup for {} failed, reporting 0x0: {}", address, e);
            quantity(0)
        }
    };
    debug!("eth_getBalance: address={} -> {}", address, balance);
    Ok(Value::String(balance))
}

/// Handler for eth_getTransactionCount
///
/// Same zero fallback as eth_getBalance.
pub async fn get_transaction_count<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let address = str_param(params, 0, "address")?;
    let tag = block_tag_param(params, 1)?;

    let count = match client.get_account(address, tag.account_height(), true).await {
        Ok(account) => quantity(account.sequence),
        Err(e) => {
            warn!("eth_getTransactionCount: lookup for {} failed, reporting 0x0: {}", address, e);
            quantity(0)
        }
    };
    debug!("eth_getTransactionCount: address={} -> {}", address, count);
    Ok(Value::String(count))
}

/// Handler for eth_getCode
pub async fn get_code<C: ScriptRpc + ?Sized>(client: &C, config: &Config, params: &[Value]) -> MethodResult {
    let address = str_param(params, 0, "address")?;
    let height = block_tag_param(params, 1)?.account_height();

    let poller = FinalizationPoller::new(CODE_FINALIZATION_ATTEMPTS, config.block_interval());
    let outcome = poller
        .poll(|| client.get_code(address, height), |found: &CodeResult| !found.code.is_empty())
        .await?;

    let code = outcome.into_inner().code;
    let code = if code.starts_with("0x") { code } else { format!("0x{}", code) };
    debug!("eth_getCode: address={}, code_len={}", address, code.len());
    Ok(Value::String(code))
}

/// Handler for eth_getStorageAt
pub async fn get_storage_at<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let address = str_param(params, 0, "address")?;
    let position = str_param(params, 1, "storage position")?;
    let height = block_tag_param(params, 2)?.account_height();

    let value = client.get_storage_at(address, position, height).await?.value;
    let digits = value.strip_prefix("0x").unwrap_or(&value);
    let result = if digits.bytes().all(|b| b == b'0') {
        quantity(0)
    } else {
        format!("0x{}", digits)
    };
    debug!("eth_getStorageAt: address={}, position={} -> {}", address, position, result);
    Ok(Value::String(result))
}

/// Handler for eth_sendRawTransaction
pub async fn send_raw_transaction<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let raw_tx = str_param(params, 0, "raw transaction")?;
    let digits = raw_tx.strip_prefix("0x").unwrap_or(raw_tx);
    hex::decode(digits)
        .map_err(|e| AdaptorError::invalid_params(format!("invalid raw transaction hex: {}", e)))?;

    let result = client.broadcast_raw_eth_transaction(raw_tx).await?;
    info!("eth_sendRawTransaction: broadcast {} bytes -> {}", digits.len() / 2, result.hash);
    Ok(Value::String(result.hash))
}

/// Handler for eth_estimateGas
///
/// Runs the call on the node without committing it and pads the gas it
/// used by 10%, capped at the block gas limit.
pub async fn estimate_gas<C: ScriptRpc + ?Sized>(client: &C, config: &Config, params: &[Value]) -> MethodResult {
    let call = call_param(params, 0)?;
    let from = call.from.unwrap_or_default();

    let sequence = match call.from {
        Some(address) => match client.get_account(&format!("{:?}", address), 0, true).await {
            Ok(account) => account.sequence + 1,
            Err(e) => {
                debug!("eth_estimateGas: no account for {:?}, using sequence 1: {}", address, e);
                1
            }
        },
        None => 1,
    };
    let gas_limit = match call.gas.as_deref() {
        Some(gas) => parse_quantity(gas)?,
        None => config.block_gas_limit,
    };
    let gas_price = match call.gas_price.as_deref() {
        Some(price) => parse_big_quantity(price)?,
        None => DEFAULT_GAS_PRICE_WEI.into(),
    };
    let value = match call.value.as_deref() {
        Some(value) => parse_big_quantity(value)?,
        None => Default::default(),
    };

    let sctx = SmartContractTx {
        from: TxInput {
            address: from,
            coins: Coins {
                spaywei: value,
                ..Default::default()
            },
            sequence,
            signature: Vec::new(),
        },
        to: TxOutput {
            address: call.to.unwrap_or_default(),
            coins: Coins::default(),
        },
        gas_limit,
        gas_price,
        data: call.payload()?,
    };

    let result = client.call_smart_contract(&sctx.to_bytes()).await?;
    if !result.vm_error.is_empty() {
        warn!("eth_estimateGas: EVM execution failed: {}", result.vm_error);
        return Err(AdaptorError::Execution(result.vm_error));
    }

    let estimate = gas_with_margin(result.gas_used, config.block_gas_limit);
    debug!("eth_estimateGas: used={} -> {}", result.gas_used, estimate);
    Ok(Value::String(quantity(estimate)))
}

/// Gas used plus 10%, never above the block gas limit.
fn gas_with_margin(gas_used: u64, block_gas_limit: u64) -> u64 {
    gas_used.saturating_add(gas_used / 10).min(block_gas_limit)
}

/// Handler for eth_getBlockByHash
pub async fn get_block_by_hash<C: ScriptRpc + ?Sized>(client: &C, config: &Config, params: &[Value]) -> MethodResult {
    let hash = hash_param(params, 0)?;
    let full = bool_param(params, 1);

    let (block, chain_id) = block_by_hash(client, hash).await?;
    let eth_block = translate_block(&block, full, chain_id, config.block_gas_limit);
    debug!("eth_getBlockByHash: hash={:?}, full={} -> height {}", hash, full, block.height);
    Ok(serde_json::to_value(&eth_block)?)
}

/// Handler for eth_getBlockByNumber
pub async fn get_block_by_number<C: ScriptRpc + ?Sized>(client: &C, config: &Config, params: &[Value]) -> MethodResult {
    let tag = block_tag_param(params, 0)?;
    let full = bool_param(params, 1);

    let (block, chain_id) = block_by_tag(client, tag).await?;
    let eth_block = translate_block(&block, full, chain_id, config.block_gas_limit);
    debug!("eth_getBlockByNumber: tag={:?}, full={} -> height {}", tag, full, block.height);
    Ok(serde_json::to_value(&eth_block)?)
}

/// Handler for eth_getBlockTransactionCountByHash
pub async fn get_block_transaction_count_by_hash<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let hash = hash_param(params, 0)?;
    let block = client.get_block(hash).await?;
    Ok(Value::String(quantity(contract_tx_count(&block) as u64)))
}

/// Handler for eth_getBlockTransactionCountByNumber
pub async fn get_block_transaction_count_by_number<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let tag = block_tag_param(params, 0)?;
    let (block, _) = block_by_tag(client, tag).await?;
    Ok(Value::String(quantity(contract_tx_count(&block) as u64)))
}

/// Handler for eth_getTransactionByBlockHashAndIndex
pub async fn get_transaction_by_block_hash_and_index<C: ScriptRpc + ?Sized>(
    client: &C,
    params: &[Value],
) -> MethodResult {
    let hash = hash_param(params, 0)?;
    let index = parse_quantity(str_param(params, 1, "index")?)?;

    let (block, chain_id) = block_by_hash(client, hash).await?;
    let tx = translate_indexed_transaction(&block, index, chain_id)?;
    Ok(serde_json::to_value(&tx)?)
}

/// Handler for eth_getTransactionByBlockNumberAndIndex
pub async fn get_transaction_by_block_number_and_index<C: ScriptRpc + ?Sized>(
    client: &C,
    params: &[Value],
) -> MethodResult {
    let tag = block_tag_param(params, 0)?;
    let index = parse_quantity(str_param(params, 1, "index")?)?;

    let (block, chain_id) = block_by_tag(client, tag).await?;
    let tx = translate_indexed_transaction(&block, index, chain_id)?;
    Ok(serde_json::to_value(&tx)?)
}

/// Handler for eth_getTransactionByHash
///
/// Unknown transactions are `null`. Pending ones carry no block fields.
pub async fn get_transaction_by_hash<C: ScriptRpc + ?Sized>(client: &C, params: &[Value]) -> MethodResult {
    let hash = hash_param(params, 0)?;

    let status = client.get_status().await?;
    let lookup = client.get_transaction(hash).await?;
    if lookup.status == TxStatus::NotFound {
        debug!("eth_getTransactionByHash: {:?} not found", hash);
        return Ok(Value::Null);
    }

    let mut ctx = TxContext {
        hash: Some(hash),
        chain_id: chain_id_of(&status),
        ..Default::default()
    };
    if !lookup.block_hash.is_zero() {
        let block = client.get_block(lookup.block_hash).await?;
        let position = reconcile(&block.transactions, hash)?;
        ctx.block_hash = Some(lookup.block_hash);
        ctx.block_number = Some(lookup.block_height);
        ctx.transaction_index = Some(position.transaction_index);
    }

    let tx = translate_native_transaction(&lookup.transaction, &ctx);
    Ok(serde_json::to_value(&tx)?)
}

/// Handler for eth_getTransactionReceipt
///
/// Waits for finalization for a bounded number of block intervals and
/// answers `null` when the transaction never finalizes in that window.
pub async fn get_transaction_receipt<C: ScriptRpc + ?Sized>(
    client: &C,
    config: &Config,
    params: &[Value],
) -> MethodResult {
    let hash = hash_param(params, 0)?;

    let poller = FinalizationPoller::new(RECEIPT_FINALIZATION_ATTEMPTS, config.block_interval());
    let outcome = poller
        .poll(|| client.get_transaction(hash), TransactionLookup::is_finalized)
        .await?;

    if !outcome.is_finalized() {
        debug!("eth_getTransactionReceipt: {:?} not finalized, returning null", hash);
        return Ok(Value::Null);
    }
    let lookup = outcome.into_inner();
    let Some(receipt) = lookup.receipt.as_ref() else {
        debug!("eth_getTransactionReceipt: {:?} finalized without a receipt", hash);
        return Ok(Value::Null);
    };

    // The lookup carries no sibling context; positions need the whole block.
    let block = client.get_block(lookup.block_hash).await?;
    let position = reconcile(&block.transactions, lookup.hash)?;

    let eth_receipt = translate_receipt(&lookup, receipt, &position);
    debug!(
        "eth_getTransactionReceipt: {:?} -> index {}, {} logs",
        hash,
        position.transaction_index,
        eth_receipt.logs.len()
    );
    Ok(serde_json::to_value(&eth_receipt)?)
}
