use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use http::{header, Method};
use jsonrpsee::server::{RpcModule, Server};
use jsonrpsee::types::ErrorObjectOwned;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::chain_id::map_chain_id;
use crate::config::Config;
use crate::methods::{eth, net, web3};
use crate::script::{ScriptApi, ScriptClient, ScriptRpc};

/// Shared state for the RPC server. Read-only after startup.
pub struct RpcState<C> {
    pub config: Config,
    pub client: C,
}

/// Start the JSON-RPC server.
pub async fn start_server(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.eth_rpc_port));

    info!("Starting Script Ethereum RPC adaptor on {}", addr);
    info!("Script RPC: {}", config.script_rpc_url);

    let client = ScriptClient::new(&config.script_rpc_url, config.rpc_timeout())?;

    match client.get_status().await {
        Ok(status) => {
            info!(
                "Script node: chain={}, latest finalized height={}, chain ID={}",
                status.chain_id,
                status.latest_finalized_block_height,
                map_chain_id(&status.chain_id, status.latest_finalized_block_height)
            );
        }
        Err(e) => {
            warn!("Could not reach Script node (will retry on requests): {}", e);
        }
    }

    let module = build_module(RpcState { config, client })?;

    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE]);
    let middleware = tower::ServiceBuilder::new().layer(cors);

    let server = Server::builder()
        .set_http_middleware(middleware)
        .build(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind server to {}: {}", addr, e))?;

    info!("Script Ethereum RPC adaptor listening on http://{}", addr);

    let handle = server.start(module);

    // Runs until shutdown signal
    handle.stopped().await;

    info!("Script Ethereum RPC adaptor stopped");
    Ok(())
}

/// Build the RPC module with every supported method registered.
pub fn build_module<C>(state: RpcState<C>) -> Result<RpcModule<RpcState<C>>>
where
    C: ScriptRpc + 'static,
{
    let mut module = RpcModule::new(state);
    register_methods(&mut module).context("Failed to register RPC methods")?;
    Ok(module)
}

/// Register all JSON-RPC methods on the module.
fn register_methods<C>(module: &mut RpcModule<RpcState<C>>) -> Result<()>
where
    C: ScriptRpc + 'static,
{
    // --- eth_* methods ---

    module.register_async_method("eth_chainId", |_params, ctx, _| async move {
        eth::chain_id(&ctx.client).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_blockNumber", |_params, ctx, _| async move {
        eth::block_number(&ctx.client).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_syncing", |_params, ctx, _| async move {
        eth::syncing(&ctx.client).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_protocolVersion", |_params, ctx, _| async move {
        eth::protocol_version(&ctx.client).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_accounts", |_params, _ctx, _| async move {
        eth::accounts().await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getBalance", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_balance(&ctx.client, &p).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getTransactionCount", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_transaction_count(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getCode", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_code(&ctx.client, &ctx.config, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getStorageAt", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_storage_at(&ctx.client, &p).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_estimateGas", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::estimate_gas(&ctx.client, &ctx.config, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_sendRawTransaction", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::send_raw_transaction(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getBlockByHash", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_block_by_hash(&ctx.client, &ctx.config, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getBlockByNumber", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_block_by_number(&ctx.client, &ctx.config, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getBlockTransactionCountByHash", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_block_transaction_count_by_hash(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getBlockTransactionCountByNumber", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_block_transaction_count_by_number(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getTransactionByBlockHashAndIndex", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_transaction_by_block_hash_and_index(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getTransactionByBlockNumberAndIndex", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_transaction_by_block_number_and_index(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getTransactionByHash", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_transaction_by_hash(&ctx.client, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("eth_getTransactionReceipt", |params, ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        eth::get_transaction_receipt(&ctx.client, &ctx.config, &p)
            .await
            .map_err(ErrorObjectOwned::from)
    })?;

    // --- net_* methods ---

    module.register_async_method("net_version", |_params, ctx, _| async move {
        net::version(&ctx.client).await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("net_listening", |_params, _ctx, _| async move {
        net::listening().await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("net_peerCount", |_params, _ctx, _| async move {
        net::peer_count().await.map_err(ErrorObjectOwned::from)
    })?;

    // --- web3_* methods ---

    module.register_async_method("web3_clientVersion", |_params, _ctx, _| async move {
        web3::client_version().await.map_err(ErrorObjectOwned::from)
    })?;

    module.register_async_method("web3_sha3", |params, _ctx, _| async move {
        let p: Vec<Value> = params.parse().unwrap_or_default();
        web3::sha3(&p).await.map_err(ErrorObjectOwned::from)
    })?;

    info!("Registered all RPC methods successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptRpcResponse;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ScriptRpc for Unreachable {
        async fn call(&self, method: &str, _args: Value) -> Result<ScriptRpcResponse> {
            Err(anyhow!("no Script node for {}", method))
        }
    }

    #[test]
    fn test_all_methods_registered() {
        let module = build_module(RpcState {
            config: Config::default(),
            client: Unreachable,
        })
        .unwrap();
        let names: Vec<&str> = module.method_names().collect();

        for method in [
            "eth_chainId",
            "eth_blockNumber",
            "eth_syncing",
            "eth_protocolVersion",
            "eth_accounts",
            "eth_getBalance",
            "eth_getTransactionCount",
            "eth_getCode",
            "eth_getStorageAt",
            "eth_estimateGas",
            "eth_sendRawTransaction",
            "eth_getBlockByHash",
            "eth_getBlockByNumber",
            "eth_getBlockTransactionCountByHash",
            "eth_getBlockTransactionCountByNumber",
            "eth_getTransactionByBlockHashAndIndex",
            "eth_getTransactionByBlockNumberAndIndex",
            "eth_getTransactionByHash",
            "eth_getTransactionReceipt",
            "net_version",
            "net_listening",
            "net_peerCount",
            "web3_clientVersion",
            "web3_sha3",
        ] {
            assert!(names.contains(&method), "{} not registered", method);
        }
        assert_eq!(names.len(), 24);
    }
}
