use ethereum_types::{H160, H256};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request to the Script node
#[derive(Debug, Serialize)]
pub struct ScriptRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl ScriptRpcRequest {
    /// Script methods take a single argument object wrapped in a params list.
    pub fn new(method: &str, args: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: 1,
            method: method.to_string(),
            params: Value::Array(vec![args]),
        }
    }
}

/// JSON-RPC response from the Script node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ScriptRpcError>,
}

impl ScriptRpcResponse {
    pub fn success(result: Value) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Value::from(1),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(code: i64, message: &str) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Value::from(1),
            result: None,
            error: Some(ScriptRpcError {
                code,
                message: message.to_string(),
                data: None,
            }),
        }
    }
}

/// JSON-RPC error from the Script node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptRpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Native transaction type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Coinbase,
    Send,
    SmartContract,
    Other(u8),
}

impl From<u8> for TxKind {
    fn from(tag: u8) -> Self {
        match tag {
            0 => TxKind::Coinbase,
            2 => TxKind::Send,
            7 => TxKind::SmartContract,
            other => TxKind::Other(other),
        }
    }
}

/// Native transaction lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    #[default]
    NotFound,
    Pending,
    Finalized,
    Abandoned,
    #[serde(other)]
    Unknown,
}

/// Coin balances carried by accounts and transaction inputs/outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Coins {
    #[serde(deserialize_with = "de::biguint_lenient")]
    pub scptwei: BigUint,
    #[serde(deserialize_with = "de::biguint_lenient")]
    pub spaywei: BigUint,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TxInput {
    #[serde(deserialize_with = "de::null_as_default")]
    pub address: H160,
    #[serde(deserialize_with = "de::null_as_default")]
    pub coins: Coins,
    /// 1-based account sequence of the sender.
    #[serde(deserialize_with = "de::u64_lenient")]
    pub sequence: u64,
    #[serde(deserialize_with = "de::hex_bytes")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TxOutput {
    #[serde(deserialize_with = "de::null_as_default")]
    pub address: H160,
    #[serde(deserialize_with = "de::null_as_default")]
    pub coins: Coins,
}

/// Contract-invocation (and contract-creation) transaction body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SmartContractTx {
    #[serde(deserialize_with = "de::null_as_default")]
    pub from: TxInput,
    #[serde(deserialize_with = "de::null_as_default")]
    pub to: TxOutput,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub gas_limit: u64,
    #[serde(deserialize_with = "de::biguint_lenient")]
    pub gas_price: BigUint,
    #[serde(deserialize_with = "de::hex_bytes")]
    pub data: Vec<u8>,
}

/// Value-transfer transaction body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SendTx {
    #[serde(deserialize_with = "de::null_as_default")]
    pub fee: Coins,
    #[serde(deserialize_with = "de::null_as_default")]
    pub inputs: Vec<TxInput>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub outputs: Vec<TxOutput>,
}

/// A native transaction, decoded according to its kind tag.
#[derive(Debug, Clone)]
pub enum NativeTransaction {
    Send(SendTx),
    SmartContract(SmartContractTx),
    /// Kinds the adaptor does not expose; the body is not decoded.
    Other(TxKind),
}

impl NativeTransaction {
    pub fn decode(kind: TxKind, raw: Value) -> Result<Self, serde_json::Error> {
        match kind {
            TxKind::SmartContract => Ok(NativeTransaction::SmartContract(serde_json::from_value(raw)?)),
            TxKind::Send => Ok(NativeTransaction::Send(serde_json::from_value(raw)?)),
            other => Ok(NativeTransaction::Other(other)),
        }
    }

    /// Sender and recipient, where the native body names them.
    pub fn parties(&self) -> Option<(H160, H160)> {
        match self {
            NativeTransaction::SmartContract(tx) => Some((tx.from.address, tx.to.address)),
            NativeTransaction::Send(tx) => {
                let from = tx.inputs.first()?.address;
                let to = tx.outputs.first().map(|o| o.address).unwrap_or_default();
                Some((from, to))
            }
            NativeTransaction::Other(_) => None,
        }
    }
}

/// Log emitted during contract execution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NativeLog {
    #[serde(deserialize_with = "de::null_as_default")]
    pub address: H160,
    #[serde(deserialize_with = "de::null_as_default")]
    pub topics: Vec<H256>,
    #[serde(deserialize_with = "de::log_data")]
    pub data: Vec<u8>,
}

/// Execution receipt. The node serializes this record with Go field names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NativeReceipt {
    #[serde(rename = "TxHash", alias = "tx_hash", deserialize_with = "de::null_as_default")]
    pub tx_hash: H256,
    #[serde(rename = "Logs", alias = "logs", deserialize_with = "de::null_as_default")]
    pub logs: Vec<NativeLog>,
    #[serde(
        rename = "ContractAddress",
        alias = "contract_address",
        deserialize_with = "de::null_as_default"
    )]
    pub contract_address: H160,
    #[serde(rename = "GasUsed", alias = "gas_used", deserialize_with = "de::u64_lenient")]
    pub gas_used: u64,
    #[serde(rename = "EvmErr", alias = "evm_err", deserialize_with = "de::null_as_default")]
    pub evm_err: String,
}

/// One entry of a block's transaction list.
#[derive(Debug, Clone)]
pub struct BlockTransaction {
    pub kind: TxKind,
    pub hash: H256,
    pub transaction: NativeTransaction,
    pub receipt: Option<NativeReceipt>,
}

#[derive(Debug, Deserialize)]
struct RawBlockTransaction {
    #[serde(default)]
    raw: Value,
    #[serde(rename = "type", default)]
    kind: u8,
    #[serde(default, deserialize_with = "de::null_as_default")]
    hash: H256,
    #[serde(default)]
    receipt: Option<NativeReceipt>,
}

impl TryFrom<RawBlockTransaction> for BlockTransaction {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlockTransaction) -> Result<Self, Self::Error> {
        let kind = TxKind::from(raw.kind);
        Ok(BlockTransaction {
            kind,
            hash: raw.hash,
            transaction: NativeTransaction::decode(kind, raw.raw)?,
            receipt: raw.receipt,
        })
    }
}

impl<'de> Deserialize<'de> for BlockTransaction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawBlockTransaction::deserialize(deserializer)?;
        BlockTransaction::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Result of script.GetBlock / script.GetBlockByHeight
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NativeBlock {
    #[serde(deserialize_with = "de::null_as_default")]
    pub chain_id: String,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub epoch: u64,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub height: u64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub hash: H256,
    #[serde(deserialize_with = "de::null_as_default")]
    pub parent: H256,
    #[serde(deserialize_with = "de::null_as_default")]
    pub transactions_hash: H256,
    #[serde(deserialize_with = "de::null_as_default")]
    pub state_hash: H256,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub timestamp: u64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub proposer: H160,
    #[serde(deserialize_with = "de::null_as_default")]
    pub transactions: Vec<BlockTransaction>,
}

/// Result of script.GetTransaction
#[derive(Debug, Clone)]
pub struct TransactionLookup {
    pub block_hash: H256,
    pub block_height: u64,
    pub status: TxStatus,
    pub hash: H256,
    pub transaction: NativeTransaction,
    pub receipt: Option<NativeReceipt>,
}

impl TransactionLookup {
    pub fn is_finalized(&self) -> bool {
        self.status == TxStatus::Finalized
    }
}

#[derive(Debug, Deserialize)]
struct RawTransactionLookup {
    #[serde(default, deserialize_with = "de::null_as_default")]
    block_hash: H256,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    block_height: u64,
    #[serde(default, deserialize_with = "de::null_as_default")]
    status: TxStatus,
    #[serde(default, deserialize_with = "de::null_as_default")]
    hash: H256,
    #[serde(rename = "type", default)]
    kind: u8,
    #[serde(default)]
    transaction: Value,
    #[serde(default)]
    receipt: Option<NativeReceipt>,
}

impl<'de> Deserialize<'de> for TransactionLookup {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTransactionLookup::deserialize(deserializer)?;
        // Unknown transactions come back without a body.
        let transaction = if raw.transaction.is_null() {
            NativeTransaction::Other(TxKind::from(raw.kind))
        } else {
            NativeTransaction::decode(TxKind::from(raw.kind), raw.transaction)
                .map_err(serde::de::Error::custom)?
        };
        Ok(TransactionLookup {
            block_hash: raw.block_hash,
            block_height: raw.block_height,
            status: raw.status,
            hash: raw.hash,
            transaction,
            receipt: raw.receipt,
        })
    }
}

/// Result of script.GetStatus
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub chain_id: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub latest_finalized_block_hash: H256,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub latest_finalized_block_height: u64,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub current_height: u64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub syncing: bool,
}

/// Result of script.GetAccount
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountResult {
    #[serde(deserialize_with = "de::u64_lenient")]
    pub sequence: u64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub coins: Coins,
}

/// Result of script.GetCode
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodeResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub code: String,
}

/// Result of script.GetStorageAt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageAtResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub value: String,
}

/// Result of script.BroadcastRawEthTransactionAsync
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BroadcastResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub hash: String,
}

/// Result of script.CallSmartContract
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CallSmartContractResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub vm_return: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub contract_address: H160,
    #[serde(deserialize_with = "de::u64_lenient")]
    pub gas_used: u64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub vm_error: String,
}

/// Result of script.GetVersion
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VersionResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub git_hash: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub timestamp: String,
}

/// Lenient field decoders: the node emits Go-marshalled JSON where integers
/// may be strings, slices may be `null` and byte payloads may be base64.
mod de {
    use base64::Engine;
    use num_bigint::BigUint;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u64),
        Str(String),
    }

    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn u64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Option::<NumOrStr>::deserialize(deserializer)? {
            None => Ok(0),
            Some(NumOrStr::Num(n)) => Ok(n),
            Some(NumOrStr::Str(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(0);
                }
                match s.strip_prefix("0x") {
                    Some(hex_str) => u64::from_str_radix(hex_str, 16),
                    None => s.parse::<u64>(),
                }
                .map_err(|e| D::Error::custom(format!("invalid integer {:?}: {}", s, e)))
            }
        }
    }

    pub fn biguint_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        match Option::<NumOrStr>::deserialize(deserializer)? {
            None => Ok(BigUint::default()),
            Some(NumOrStr::Num(n)) => Ok(BigUint::from(n)),
            Some(NumOrStr::Str(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(BigUint::default());
                }
                let parsed = match s.strip_prefix("0x") {
                    Some(hex_str) => BigUint::parse_bytes(hex_str.as_bytes(), 16),
                    None => BigUint::parse_bytes(s.as_bytes(), 10),
                };
                parsed.ok_or_else(|| D::Error::custom(format!("invalid big integer {:?}", s)))
            }
        }
    }

    pub fn hex_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let hex_str = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(hex_str).map_err(|e| D::Error::custom(format!("invalid hex bytes: {}", e)))
    }

    /// Log payloads are Go `[]byte`, marshalled as standard base64.
    pub fn log_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        base64::engine::general_purpose::STANDARD
            .decode(&s)
            .map_err(|e| D::Error::custom(format!("invalid base64 log data: {}", e)))
    }
}
