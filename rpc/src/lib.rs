//! Script Ethereum RPC Adaptor
//!
//! This crate implements a JSON-RPC server that accepts Ethereum-compatible
//! RPC calls (eth_*, net_*, web3_*) and answers them from a Script node's
//! native `script.*` JSON-RPC API. Wallets, explorers and EVM tooling can
//! then talk to a Script chain as if it were an Ethereum node.
//!
//! # Architecture
//!
//! ```text
//! Developer (MetaMask/Hardhat/ethers.js)
//!     |
//!     | eth_* JSON-RPC calls
//!     v
//! Script Ethereum RPC Adaptor (this crate)
//!     |
//!     | script.* JSON-RPC calls
//!     v
//! Script node
//! ```
//!
//! # Modules
//!
//! - `config` - Environment and configuration management
//! - `server` - JSON-RPC server setup and method registration
//! - `methods` - Individual RPC method implementations (eth, net, web3)
//! - `script` - Script node RPC client, wire types and response handling
//! - `translator` - Script block/transaction/receipt -> Ethereum format
//! - `reconcile` - Transaction index, cumulative gas and log index recovery
//! - `poller` - Waiting for native finalization
//! - `chain_id` - Script chain identifier -> Ethereum chain ID

pub mod chain_id;
pub mod config;
pub mod error;
pub mod methods;
pub mod poller;
pub mod reconcile;
pub mod script;
pub mod server;
pub mod translator;
