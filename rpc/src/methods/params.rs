use ethereum_types::{H160, H256};
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AdaptorError;

/// Ethereum block parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// `latest`, `pending`, `safe` and `finalized` all name the latest
    /// finalized block; the native chain exposes nothing newer.
    Latest,
    Earliest,
    Number(u64),
}

impl BlockTag {
    pub fn parse(tag: &str) -> Result<Self, AdaptorError> {
        match tag {
            "latest" | "pending" | "safe" | "finalized" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            other => parse_quantity(other).map(BlockTag::Number),
        }
    }

    /// Height for account-scoped native queries, where `0` means latest.
    pub fn account_height(&self) -> u64 {
        match self {
            BlockTag::Latest | BlockTag::Earliest => 0,
            BlockTag::Number(height) => *height,
        }
    }
}

/// Parse a 0x-prefixed hex quantity.
pub fn parse_quantity(value: &str) -> Result<u64, AdaptorError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| AdaptorError::invalid_params(format!("expected hex quantity, got {:?}", value)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| AdaptorError::invalid_params(format!("invalid hex quantity {:?}: {}", value, e)))
}

/// Parse a 0x-prefixed hex quantity of any width. Bare "0x" is zero.
pub fn parse_big_quantity(value: &str) -> Result<BigUint, AdaptorError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| AdaptorError::invalid_params(format!("expected hex quantity, got {:?}", value)))?;
    if digits.is_empty() {
        return Ok(BigUint::default());
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| AdaptorError::invalid_params(format!("invalid hex quantity {:?}", value)))
}

/// Transaction call object taken by eth_estimateGas.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallObject {
    pub from: Option<H160>,
    pub to: Option<H160>,
    pub gas: Option<String>,
    pub gas_price: Option<String>,
    pub value: Option<String>,
    pub data: Option<String>,
    pub input: Option<String>,
}

impl CallObject {
    /// Call data, from `input` or its older alias `data`.
    pub fn payload(&self) -> Result<Vec<u8>, AdaptorError> {
        let Some(raw) = self.input.as_deref().or(self.data.as_deref()) else {
            return Ok(Vec::new());
        };
        let digits = raw.strip_prefix("0x").unwrap_or(raw);
        hex::decode(digits).map_err(|e| AdaptorError::invalid_params(format!("invalid call data: {}", e)))
    }
}

pub fn call_param(params: &[Value], index: usize) -> Result<CallObject, AdaptorError> {
    let raw = params
        .get(index)
        .ok_or_else(|| AdaptorError::invalid_params("missing call object"))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| AdaptorError::invalid_params(format!("invalid call object: {}", e)))
}

pub fn str_param<'a>(params: &'a [Value], index: usize, name: &str) -> Result<&'a str, AdaptorError> {
    params
        .get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| AdaptorError::invalid_params(format!("missing {} parameter", name)))
}

/// Block tag at `index`, `latest` when omitted.
pub fn block_tag_param(params: &[Value], index: usize) -> Result<BlockTag, AdaptorError> {
    match params.get(index) {
        None | Some(Value::Null) => Ok(BlockTag::Latest),
        Some(Value::String(tag)) => BlockTag::parse(tag),
        Some(other) => Err(AdaptorError::invalid_params(format!("invalid block tag {}", other))),
    }
}

pub fn hash_param(params: &[Value], index: usize) -> Result<H256, AdaptorError> {
    let raw = str_param(params, index, "hash")?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(digits)
        .map_err(|e| AdaptorError::invalid_params(format!("invalid hash {:?}: {}", raw, e)))?;
    if bytes.len() != 32 {
        return Err(AdaptorError::invalid_params(format!("hash must be 32 bytes, got {}", bytes.len())));
    }
    Ok(H256::from_slice(&bytes))
}

pub fn bool_param(params: &[Value], index: usize) -> bool {
    params.get(index).and_then(Value::as_bool).unwrap_or(false)
}
