use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethereum_types::H256;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::envelope::{decode_block, decode_json, handle_response};
use super::types::*;
use crate::error::AdaptorError;

/// Transport to a Script node's JSON-RPC endpoint.
///
/// An `Err` means the call itself failed; protocol errors come back inside
/// the response envelope.
#[async_trait]
pub trait ScriptRpc: Send + Sync {
    async fn call(&self, method: &str, args: Value) -> Result<ScriptRpcResponse>;
}

/// Client wrapper for Script RPC API calls.
#[derive(Clone)]
pub struct ScriptClient {
    http_client: Client,
    rpc_url: String,
}

impl ScriptClient {
    /// Create a new Script RPC client.
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http_client,
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl ScriptRpc for ScriptClient {
    async fn call(&self, method: &str, args: Value) -> Result<ScriptRpcResponse> {
        let request = ScriptRpcRequest::new(method, args);
        debug!("Sending Script RPC request: method={}", request.method);

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Script RPC")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Script RPC returned HTTP {}: {}", status, body);
            return Err(anyhow!("Script RPC HTTP error: {} - {}", status, body));
        }

        response
            .json()
            .await
            .context("Failed to parse Script RPC response")
    }
}

/// Typed Script RPC operations, available on every [`ScriptRpc`] transport.
#[async_trait]
pub trait ScriptApi: ScriptRpc {
    async fn get_status(&self) -> Result<StatusResult, AdaptorError> {
        handle_response(self.call("script.GetStatus", json!({})).await, decode_json)
    }

    async fn get_version(&self) -> Result<VersionResult, AdaptorError> {
        handle_response(self.call("script.GetVersion", json!({})).await, decode_json)
    }

    /// Height `0` means the latest finalized state.
    async fn get_account(
        &self,
        address: &str,
        height: u64,
        preview: bool,
    ) -> Result<AccountResult, AdaptorError> {
        let args = json!({
            "address": address,
            "height": height.to_string(),
            "preview": preview,
        });
        handle_response(self.call("script.GetAccount", args).await, decode_json)
    }

    async fn get_block(&self, hash: H256) -> Result<NativeBlock, AdaptorError> {
        let args = json!({ "hash": format!("{:?}", hash) });
        handle_response(self.call("script.GetBlock", args).await, decode_block)
    }

    async fn get_block_by_height(&self, height: u64) -> Result<NativeBlock, AdaptorError> {
        let args = json!({ "height": height.to_string() });
        handle_response(self.call("script.GetBlockByHeight", args).await, decode_block)
    }

    async fn get_transaction(&self, hash: H256) -> Result<TransactionLookup, AdaptorError> {
        let args = json!({ "hash": format!("{:?}", hash) });
        handle_response(self.call("script.GetTransaction", args).await, decode_json)
    }

    async fn get_code(&self, address: &str, height: u64) -> Result<CodeResult, AdaptorError> {
        let args = json!({ "address": address, "height": height.to_string() });
        handle_response(self.call("script.GetCode", args).await, decode_json)
    }

    async fn get_storage_at(
        &self,
        address: &str,
        position: &str,
        height: u64,
    ) -> Result<StorageAtResult, AdaptorError> {
        let args = json!({
            "address": address,
            "storage_position": position,
            "height": height.to_string(),
        });
        handle_response(self.call("script.GetStorageAt", args).await, decode_json)
    }

    /// Execute an unsigned smart contract transaction against the latest
    /// state without committing it.
    async fn call_smart_contract(
        &self,
        sctx_bytes: &[u8],
    ) -> Result<CallSmartContractResult, AdaptorError> {
        let args = json!({ "sctx_bytes": hex::encode(sctx_bytes) });
        handle_response(self.call("script.CallSmartContract", args).await, decode_json)
    }

    async fn broadcast_raw_eth_transaction(
        &self,
        tx_bytes: &str,
    ) -> Result<BroadcastResult, AdaptorError> {
        let args = json!({ "tx_bytes": tx_bytes });
        handle_response(
            self.call("script.BroadcastRawEthTransactionAsync", args).await,
            decode_json,
        )
    }
}

impl<T: ScriptRpc + ?Sized> ScriptApi for T {}
