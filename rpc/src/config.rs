use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Adaptor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Script node JSON-RPC endpoint URL
    pub script_rpc_url: String,
    /// Ethereum RPC server port
    pub eth_rpc_port: u16,
    /// Static gas limit reported for every block
    pub block_gas_limit: u64,
    /// Native block interval in milliseconds
    pub block_interval_ms: u64,
    /// Per-request timeout for native calls, in seconds
    pub rpc_timeout_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script_rpc_url: "http://127.0.0.1:16888/rpc".to_string(),
            eth_rpc_port: 18888,
            block_gas_limit: 20_000_000,
            block_interval_ms: 6000,
            rpc_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Call dotenvy::dotenv() before calling this.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let script_rpc_url = env::var("SCRIPT_RPC_URL").unwrap_or(defaults.script_rpc_url);

        let eth_rpc_port: u16 = parse_var("ETH_RPC_PORT", defaults.eth_rpc_port)
            .context("ETH_RPC_PORT must be a valid u16")?;

        let block_gas_limit: u64 = parse_var("SCRIPT_BLOCK_GAS_LIMIT", defaults.block_gas_limit)
            .context("SCRIPT_BLOCK_GAS_LIMIT must be a valid u64")?;

        let block_interval_ms: u64 = parse_var("SCRIPT_BLOCK_INTERVAL_MS", defaults.block_interval_ms)
            .context("SCRIPT_BLOCK_INTERVAL_MS must be a valid u64")?;

        let rpc_timeout_secs: u64 = parse_var("SCRIPT_RPC_TIMEOUT_SECS", defaults.rpc_timeout_secs)
            .context("SCRIPT_RPC_TIMEOUT_SECS must be a valid u64")?;

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);

        Ok(Config {
            script_rpc_url,
            eth_rpc_port,
            block_gas_limit,
            block_interval_ms,
            rpc_timeout_secs,
            log_level,
        })
    }

    pub fn block_interval(&self) -> Duration {
        Duration::from_millis(self.block_interval_ms)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => Ok(raw.trim().parse()?),
        Err(_) => Ok(default),
    }
}
