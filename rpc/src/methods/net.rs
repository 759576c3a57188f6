use serde_json::Value;
use tracing::debug;

use super::eth::MethodResult;
use crate::chain_id::map_chain_id;
use crate::script::{ScriptApi, ScriptRpc};

/// Handler for net_version
/// Returns the chain ID as a decimal string.
pub async fn version<C: ScriptRpc + ?Sized>(client: &C) -> MethodResult {
    let status = client.get_status().await?;
    let version = map_chain_id(&status.chain_id, status.latest_finalized_block_height).to_string();
    debug!("net_version -> {}", version);
    Ok(Value::String(version))
}

/// Handler for net_listening
pub async fn listening() -> MethodResult {
    Ok(Value::Bool(true))
}

/// Handler for net_peerCount
/// The adaptor's only peer is the Script node it fronts.
pub async fn peer_count() -> MethodResult {
    Ok(Value::String("0x1".to_string()))
}
