//! Script Ethereum RPC Adaptor
//!
//! Entry point for the adaptor that serves Ethereum JSON-RPC from a Script
//! node. Loads configuration from environment/.env file and starts the
//! JSON-RPC server on the configured port.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use script_eth_rpc::config::Config;
use script_eth_rpc::server::start_server;

#[derive(Parser, Debug)]
#[command(name = "script-eth-rpc")]
#[command(version, about = "Ethereum JSON-RPC adaptor for Script nodes")]
struct Cli {
    /// Script node JSON-RPC endpoint (overrides SCRIPT_RPC_URL)
    #[arg(long)]
    script_rpc_url: Option<String>,

    /// Port to serve Ethereum JSON-RPC on (overrides ETH_RPC_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.script_rpc_url {
        config.script_rpc_url = url;
    }
    if let Some(port) = cli.port {
        config.eth_rpc_port = port;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();

    info!("=== Script Ethereum RPC Adaptor ===");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  RPC Port: {}", config.eth_rpc_port);
    info!("  Script RPC: {}", config.script_rpc_url);
    info!("  Block gas limit: {}", config.block_gas_limit);
    info!("  Block interval: {:?}", config.block_interval());

    start_server(config).await?;

    Ok(())
}
