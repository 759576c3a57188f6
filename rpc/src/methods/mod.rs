//! Ethereum JSON-RPC method handlers, one function per method.

pub mod eth;
pub mod net;
pub mod params;
pub mod web3;
