use serde_json::Value;
use sha3::{Digest, Keccak256};
use tracing::debug;

use super::eth::MethodResult;
use super::params::str_param;
use crate::error::AdaptorError;

/// Handler for web3_clientVersion
pub async fn client_version() -> MethodResult {
    let version = format!("ScriptEthRpc/v{}", env!("CARGO_PKG_VERSION"));
    debug!("web3_clientVersion -> {}", version);
    Ok(Value::String(version))
}

/// Handler for web3_sha3
/// Returns the Keccak-256 hash of the given data.
pub async fn sha3(params: &[Value]) -> MethodResult {
    let data_hex = str_param(params, 0, "data")?;
    let data_bytes = hex::decode(data_hex.strip_prefix("0x").unwrap_or(data_hex))
        .map_err(|e| AdaptorError::invalid_params(format!("invalid hex data: {}", e)))?;

    let hash = Keccak256::digest(&data_bytes);
    let result = format!("0x{}", hex::encode(hash));

    debug!("web3_sha3: input_len={} -> {}", data_bytes.len(), result);
    Ok(Value::String(result))
}
