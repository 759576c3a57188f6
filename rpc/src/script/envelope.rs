use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use super::types::{NativeBlock, ScriptRpcResponse};
use crate::error::AdaptorError;

/// Classify the outcome of a Script RPC call and decode its result payload.
///
/// A failed call becomes [`AdaptorError::Transport`], a response carrying an
/// error object becomes [`AdaptorError::Remote`], and a successful payload is
/// serialized to bytes and handed to `decode`. Nothing here retries.
pub fn handle_response<T, F>(
    outcome: anyhow::Result<ScriptRpcResponse>,
    decode: F,
) -> Result<T, AdaptorError>
where
    F: FnOnce(&[u8]) -> Result<T, AdaptorError>,
{
    let response = outcome.map_err(|e| AdaptorError::Transport(format!("{:#}", e)))?;

    if let Some(err) = response.error {
        error!("Script RPC error: code={}, message={}", err.code, err.message);
        return Err(AdaptorError::Remote {
            code: err.code,
            message: err.message,
        });
    }

    let payload = serde_json::to_vec(&response.result.unwrap_or(Value::Null))?;
    decode(&payload)
}

/// Decoder for result types that map straight onto their JSON shape.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AdaptorError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decoder for block results. The node answers an unknown block with a null
/// or hashless result rather than an error.
pub fn decode_block(bytes: &[u8]) -> Result<NativeBlock, AdaptorError> {
    let block: Option<NativeBlock> = serde_json::from_slice(bytes)?;
    match block {
        Some(block) if !block.hash.is_zero() => Ok(block),
        _ => Err(AdaptorError::EmptyBlock),
    }
}
