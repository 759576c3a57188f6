// Shared fixtures for the handler integration tests: an in-memory Script
// node and builders for the JSON it answers with.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use script_eth_rpc::script::{ScriptRpc, ScriptRpcResponse};

/// Scripted stand-in for a Script node.
///
/// Each method answers from its own queue. The last queued answer repeats
/// once the queue is down to one entry. Methods with nothing queued fail at
/// the transport level.
#[derive(Default)]
pub struct FakeScript {
    answers: Mutex<HashMap<String, VecDeque<Option<ScriptRpcResponse>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result for `method`.
    pub fn with_result(self, method: &str, result: Value) -> Self {
        self.push(method, Some(ScriptRpcResponse::success(result)))
    }

    /// Queue a protocol error for `method`.
    pub fn with_error(self, method: &str, code: i64, message: &str) -> Self {
        self.push(method, Some(ScriptRpcResponse::failure(code, message)))
    }

    /// Queue a transport failure for `method`.
    pub fn with_transport_failure(self, method: &str) -> Self {
        self.push(method, None)
    }

    fn push(self, method: &str, answer: Option<ScriptRpcResponse>) -> Self {
        self.answers
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|(m, _)| m == method).count()
    }

    pub fn methods_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|(m, _)| m).collect()
    }
}

#[async_trait]
impl ScriptRpc for FakeScript {
    async fn call(&self, method: &str, args: Value) -> Result<ScriptRpcResponse> {
        self.calls.lock().unwrap().push((method.to_string(), args));

        let mut answers = self.answers.lock().unwrap();
        let queue = answers
            .get_mut(method)
            .ok_or_else(|| anyhow!("connection refused: nothing scripted for {}", method))?;
        let answer = if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().cloned().flatten()
        };
        answer.ok_or_else(|| anyhow!("connection refused"))
    }
}

pub fn hash(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 32]))
}

pub fn address(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 20]))
}

pub fn status(chain_id: &str, height: u64) -> Value {
    json!({
        "address": address(0x99),
        "chain_id": chain_id,
        "latest_finalized_block_hash": hash(0xf0),
        "latest_finalized_block_height": height.to_string(),
        "current_height": height.to_string(),
        "current_epoch": height.to_string(),
        "syncing": false,
    })
}

pub fn signature() -> String {
    format!("0x{}{}01", "11".repeat(32), "22".repeat(32))
}

/// Raw body of a contract transaction from `from` to `to`.
pub fn contract_body(from: u8, to: &str, sequence: u64) -> Value {
    json!({
        "from": {
            "address": address(from),
            "coins": { "scptwei": "0", "spaywei": "0" },
            "sequence": sequence.to_string(),
            "signature": signature(),
        },
        "to": { "address": to, "coins": { "scptwei": "0", "spaywei": "0" } },
        "gas_limit": "100000",
        "gas_price": "4000000000000",
        "data": "0x6080",
    })
}

pub fn native_log(emitter: u8, data: &str) -> Value {
    json!({
        "address": address(emitter),
        "topics": [hash(0x70)],
        "data": data,
    })
}

pub fn receipt(tx_hash: &str, gas_used: u64, logs: Vec<Value>) -> Value {
    json!({
        "TxHash": tx_hash,
        "Logs": logs,
        "EvmRet": "",
        "ContractAddress": address(0),
        "GasUsed": gas_used,
        "EvmErr": "",
    })
}

pub fn contract_entry(tx_hash: &str, gas_used: u64, logs: Vec<Value>) -> Value {
    json!({
        "raw": contract_body(0xaa, &address(0xcc), 4),
        "type": 7,
        "hash": tx_hash,
        "receipt": receipt(tx_hash, gas_used, logs),
    })
}

pub fn send_entry(tx_hash: &str) -> Value {
    json!({
        "raw": {
            "fee": { "scptwei": "0", "spaywei": "300000000000000" },
            "inputs": [{
                "address": address(0x01),
                "coins": { "scptwei": "0", "spaywei": "5" },
                "sequence": "9",
                "signature": signature(),
            }],
            "outputs": [{ "address": address(0x02), "coins": { "scptwei": "0", "spaywei": "5" } }],
        },
        "type": 2,
        "hash": tx_hash,
        "receipt": null,
    })
}

pub fn coinbase_entry(tx_hash: &str) -> Value {
    json!({
        "raw": { "proposer": { "address": address(0x07) }, "outputs": null, "block_height": "100" },
        "type": 0,
        "hash": tx_hash,
        "receipt": null,
    })
}

pub fn block(height: u64, block_hash: &str, transactions: Vec<Value>) -> Value {
    json!({
        "chain_id": "privatenet",
        "epoch": height.to_string(),
        "height": height.to_string(),
        "parent": hash(0x0e),
        "transactions_hash": hash(0x0a),
        "state_hash": hash(0x0b),
        "timestamp": "1700000000",
        "proposer": address(0x07),
        "hcc": { "BlockHash": hash(0x0e) },
        "guardian_votes": null,
        "children": [],
        "status": 4,
        "hash": block_hash,
        "transactions": transactions,
    })
}

pub fn lookup(tx_hash: &str, status: &str, block_hash: Option<&str>, body: Value, receipt: Value) -> Value {
    json!({
        "block_hash": block_hash,
        "block_height": if block_hash.is_some() { "100" } else { "0" },
        "status": status,
        "hash": tx_hash,
        "type": 7,
        "transaction": body,
        "receipt": receipt,
    })
}
