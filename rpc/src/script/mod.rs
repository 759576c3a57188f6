pub mod client;
pub mod envelope;
pub mod sctx;
pub mod types;

pub use client::{ScriptApi, ScriptClient, ScriptRpc};
pub use envelope::{decode_block, decode_json, handle_response};
pub use types::{
    BlockTransaction, NativeBlock, NativeLog, NativeReceipt, NativeTransaction, ScriptRpcResponse,
    SmartContractTx, SendTx, TransactionLookup, TxKind, TxStatus,
};
