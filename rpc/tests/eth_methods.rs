// Integration tests for the eth_*/net_* handlers.
// Each test drives a handler end to end against a scripted Script node.

mod common;

use std::time::Duration;

use jsonrpsee::types::ErrorObjectOwned;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::*;
use ethereum_types::H160;
use num_bigint::BigUint;
use script_eth_rpc::config::Config;
use script_eth_rpc::error::{AdaptorError, INTERNAL_ERROR_CODE};
use script_eth_rpc::methods::{eth, net};
use script_eth_rpc::script::types::{Coins, TxInput, TxOutput};
use script_eth_rpc::script::SmartContractTx;

fn config() -> Config {
    Config {
        block_interval_ms: 6000,
        ..Config::default()
    }
}

/// Block 100: [A send, B contract with 2 logs, C contract with 1 log].
fn three_tx_block() -> Value {
    block(
        100,
        &hash(0xb0),
        vec![
            send_entry(&hash(0xa1)),
            contract_entry(&hash(0xa2), 40_000, vec![native_log(0x31, "AAE="), native_log(0x32, "")]),
            contract_entry(&hash(0xa3), 25_000, vec![native_log(0x33, "vu8=")]),
        ],
    )
}

#[tokio::test]
async fn test_receipt_reconciled_against_block() {
    let script = FakeScript::new()
        .with_result(
            "script.GetTransaction",
            lookup(
                &hash(0xa3),
                "finalized",
                Some(&hash(0xb0)),
                contract_body(0xaa, &address(0xcc), 4),
                receipt(&hash(0xa3), 25_000, vec![native_log(0x33, "vu8=")]),
            ),
        )
        .with_result("script.GetBlock", three_tx_block());

    let result = eth::get_transaction_receipt(&script, &config(), &[json!(hash(0xa3))])
        .await
        .unwrap();

    assert_eq!(
        result,
        json!({
            "transactionHash": hash(0xa3),
            "transactionIndex": "0x2",
            "blockHash": hash(0xb0),
            "blockNumber": "0x64",
            "from": address(0xaa),
            "to": address(0xcc),
            "cumulativeGasUsed": "0xfde8",
            "gasUsed": "0x61a8",
            "contractAddress": null,
            "logs": [{
                "address": address(0x33),
                "topics": [hash(0x70)],
                "data": "0xbeef",
                "blockNumber": "0x64",
                "transactionHash": hash(0xa3),
                "transactionIndex": "0x2",
                "blockHash": hash(0xb0),
                "logIndex": "0x2",
                "removed": false,
            }],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "status": "0x1",
            "type": "0x0",
        })
    );
    assert_eq!(script.methods_called(), vec!["script.GetTransaction", "script.GetBlock"]);
    assert_eq!(script.calls()[1].1, json!({ "hash": hash(0xb0) }));
}

#[tokio::test(start_paused = true)]
async fn test_receipt_gives_up_with_null() {
    let script = FakeScript::new().with_result(
        "script.GetTransaction",
        lookup(&hash(0xa3), "pending", None, Value::Null, Value::Null),
    );
    let started = tokio::time::Instant::now();

    let result = eth::get_transaction_receipt(&script, &config(), &[json!(hash(0xa3))])
        .await
        .unwrap();

    assert_eq!(result, Value::Null);
    assert_eq!(script.call_count("script.GetTransaction"), 5);
    assert_eq!(script.call_count("script.GetBlock"), 0);
    assert_eq!(started.elapsed(), Duration::from_millis(6000) * 4);
}

#[tokio::test(start_paused = true)]
async fn test_receipt_waits_for_finalization() {
    let finalized = lookup(
        &hash(0xa2),
        "finalized",
        Some(&hash(0xb0)),
        contract_body(0xaa, &address(0xcc), 4),
        receipt(&hash(0xa2), 40_000, vec![native_log(0x31, "AAE="), native_log(0x32, "")]),
    );
    let script = FakeScript::new()
        .with_result("script.GetTransaction", lookup(&hash(0xa2), "not_found", None, Value::Null, Value::Null))
        .with_result("script.GetTransaction", lookup(&hash(0xa2), "pending", None, Value::Null, Value::Null))
        .with_result("script.GetTransaction", finalized)
        .with_result("script.GetBlock", three_tx_block());

    let result = eth::get_transaction_receipt(&script, &config(), &[json!(hash(0xa2))])
        .await
        .unwrap();

    assert_eq!(script.call_count("script.GetTransaction"), 3);
    assert_eq!(result["transactionIndex"], json!("0x1"));
    assert_eq!(result["cumulativeGasUsed"], json!("0x9c40"));
    let log_indices: Vec<&Value> = result["logs"].as_array().unwrap().iter().map(|l| &l["logIndex"]).collect();
    assert_eq!(log_indices, vec![&json!("0x0"), &json!("0x1")]);
    assert_eq!(result["logs"][0]["data"], json!("0x0001"));
}

#[tokio::test]
async fn test_receipt_for_hash_missing_from_block() {
    let script = FakeScript::new()
        .with_result(
            "script.GetTransaction",
            lookup(
                &hash(0xee),
                "finalized",
                Some(&hash(0xb0)),
                contract_body(0xaa, &address(0xcc), 4),
                receipt(&hash(0xee), 1, vec![]),
            ),
        )
        .with_result("script.GetBlock", three_tx_block());

    let err = eth::get_transaction_receipt(&script, &config(), &[json!(hash(0xee))])
        .await
        .unwrap_err();
    assert!(matches!(err, AdaptorError::TransactionNotFound(_)));
}

#[tokio::test]
async fn test_balance_of_unknown_account_is_zero() {
    let script = FakeScript::new().with_error("script.GetAccount", -32000, "Account 0xaa not found");
    let balance = eth::get_balance(&script, &[json!(address(0xaa)), json!("latest")])
        .await
        .unwrap();
    assert_eq!(balance, json!("0x0"));

    let script = FakeScript::new().with_transport_failure("script.GetAccount");
    let count = eth::get_transaction_count(&script, &[json!(address(0xaa)), json!("latest")])
        .await
        .unwrap();
    assert_eq!(count, json!("0x0"));
}

#[tokio::test]
async fn test_balance_and_nonce() {
    let account = json!({
        "sequence": "12",
        "coins": { "scptwei": "7", "spaywei": "1000000000000000000" },
        "reserved_funds": null,
        "last_updated_block_height": "90",
        "root": hash(0),
        "code": hash(0),
    });
    let script = FakeScript::new().with_result("script.GetAccount", account);

    let balance = eth::get_balance(&script, &[json!(address(0xaa)), json!("latest")])
        .await
        .unwrap();
    let count = eth::get_transaction_count(&script, &[json!(address(0xaa)), json!("0x5a")])
        .await
        .unwrap();

    assert_eq!(balance, json!("0xde0b6b3a7640000"));
    assert_eq!(count, json!("0xc"));
    let calls = script.calls();
    assert_eq!(calls[0].1, json!({ "address": address(0xaa), "height": "0", "preview": false }));
    assert_eq!(calls[1].1, json!({ "address": address(0xaa), "height": "90", "preview": true }));
}

#[tokio::test]
async fn test_storage_zero_slot() {
    let script = FakeScript::new().with_result("script.GetStorageAt", json!({ "value": "0".repeat(64) }));
    let value = eth::get_storage_at(&script, &[json!(address(0xcc)), json!("0x0"), json!("latest")])
        .await
        .unwrap();
    assert_eq!(value, json!("0x0"));
}

#[tokio::test]
async fn test_index_out_of_range() {
    let script = FakeScript::new()
        .with_result("script.GetStatus", status("privatenet", 100))
        .with_result("script.GetBlockByHeight", three_tx_block());

    let err = eth::get_transaction_by_block_number_and_index(&script, &[json!("0x64"), json!("0x3")])
        .await
        .unwrap_err();
    assert!(matches!(err, AdaptorError::IndexOutOfRange { index: 3, count: 3 }));
    assert_eq!(ErrorObjectOwned::from(err).code(), INTERNAL_ERROR_CODE);

    // Index 0 is the send transaction; every kind counts toward the index.
    let tx = eth::get_transaction_by_block_number_and_index(&script, &[json!("0x64"), json!("0x0")])
        .await
        .unwrap();
    assert_eq!(tx["hash"], json!(hash(0xa1)));
    assert_eq!(tx["from"], json!(address(0x01)));
    assert_eq!(tx["to"], json!(address(0x02)));
    assert_eq!(tx["nonce"], json!("0x8"));
    assert_eq!(tx["gas"], json!("0x110d9316ec000"));
}

#[tokio::test]
async fn test_block_hashes_and_full_detail() {
    let script = FakeScript::new()
        .with_result("script.GetStatus", status("privatenet", 100))
        .with_result("script.GetBlockByHeight", three_tx_block());

    let hashes = eth::get_block_by_number(&script, &config(), &[json!("latest"), json!(false)])
        .await
        .unwrap();
    assert_eq!(hashes["transactions"], json!([hash(0xa2), hash(0xa3)]));
    assert_eq!(hashes["number"], json!("0x64"));
    assert_eq!(hashes["gasLimit"], json!("0x1312d00"));
    assert_eq!(hashes["gasUsed"], json!("0xfde8"));
    assert_eq!(hashes["miner"], json!(address(0x07)));
    assert_eq!(script.calls()[1].1, json!({ "height": "100" }));

    let full = eth::get_block_by_number(&script, &config(), &[json!("0x64"), json!(true)])
        .await
        .unwrap();
    let txs = full["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0]["transactionIndex"], json!("0x1"));
    assert_eq!(txs[0]["nonce"], json!("0x3"));
    assert_eq!(txs[0]["v"], json!("0x1c"));
    assert_eq!(txs[1]["blockHash"], json!(hash(0xb0)));

    let count = eth::get_block_transaction_count_by_number(&script, &[json!("0x64")])
        .await
        .unwrap();
    assert_eq!(count, json!("0x2"));
}

#[tokio::test]
async fn test_block_translation_is_stable() {
    let script = FakeScript::new()
        .with_result("script.GetStatus", status("privatenet", 100))
        .with_result("script.GetBlock", three_tx_block());

    let first = eth::get_block_by_hash(&script, &config(), &[json!(hash(0xb0)), json!(true)])
        .await
        .unwrap();
    let second = eth::get_block_by_hash(&script, &config(), &[json!(hash(0xb0)), json!(true)])
        .await
        .unwrap();
    assert_eq!(serde_json::to_vec(&first).unwrap(), serde_json::to_vec(&second).unwrap());
}

#[tokio::test]
async fn test_empty_block() {
    let script = FakeScript::new()
        .with_result("script.GetStatus", status("privatenet", 100))
        .with_result("script.GetBlock", Value::Null);

    let err = eth::get_block_by_hash(&script, &config(), &[json!(hash(0xb0)), json!(false)])
        .await
        .unwrap_err();
    assert!(matches!(err, AdaptorError::EmptyBlock));
}

#[tokio::test]
async fn test_remote_error_message_passes_through() {
    let script = FakeScript::new().with_error("script.GetStatus", -32000, "node is shutting down");
    let err = eth::block_number(&script).await.unwrap_err();
    let obj = ErrorObjectOwned::from(err);
    assert_eq!(obj.message(), "node is shutting down");
}

#[tokio::test]
async fn test_chain_id_after_offset_height() {
    let script = FakeScript::new().with_result("script.GetStatus", status("mainnet", 2_600_000));
    assert_eq!(eth::chain_id(&script).await.unwrap(), json!("0x169"));
    assert_eq!(net::version(&script).await.unwrap(), json!("361"));

    let script = FakeScript::new().with_result("script.GetStatus", status("testnet", 10));
    assert_eq!(eth::chain_id(&script).await.unwrap(), json!("0x5"));
}

#[tokio::test]
async fn test_transaction_by_hash() {
    let script = FakeScript::new()
        .with_result("script.GetStatus", status("privatenet", 100))
        .with_result(
            "script.GetTransaction",
            lookup(
                &hash(0xa3),
                "finalized",
                Some(&hash(0xb0)),
                contract_body(0xaa, &address(0), 4),
                receipt(&hash(0xa3), 25_000, vec![]),
            ),
        )
        .with_result("script.GetBlock", three_tx_block());

    let tx = eth::get_transaction_by_hash(&script, &[json!(hash(0xa3))]).await.unwrap();
    assert_eq!(tx["hash"], json!(hash(0xa3)));
    assert_eq!(tx["transactionIndex"], json!("0x2"));
    assert_eq!(tx["blockNumber"], json!("0x64"));
    assert_eq!(tx["to"], Value::Null);
    assert_eq!(tx["nonce"], json!("0x3"));
    assert_eq!(tx["chainId"], json!("0x6"));
}

#[tokio::test]
async fn test_unknown_transaction_is_null() {
    let script = FakeScript::new()
        .with_result("script.GetStatus", status("privatenet", 100))
        .with_result(
            "script.GetTransaction",
            lookup(&hash(0x55), "not_found", None, Value::Null, Value::Null),
        );

    let tx = eth::get_transaction_by_hash(&script, &[json!(hash(0x55))]).await.unwrap();
    assert_eq!(tx, Value::Null);
    assert_eq!(script.call_count("script.GetBlock"), 0);
}

#[tokio::test]
async fn test_syncing_progress() {
    let mut node_status = status("privatenet", 100);
    node_status["syncing"] = json!(true);
    node_status["current_height"] = json!("80");
    let script = FakeScript::new().with_result("script.GetStatus", node_status);

    assert_eq!(
        eth::syncing(&script).await.unwrap(),
        json!({
            "startingBlock": "0x1",
            "currentBlock": "0x50",
            "highestBlock": "0x64",
            "pulledStates": "0x50",
            "knownStates": "0x50",
        })
    );
}

#[tokio::test]
async fn test_estimate_gas_builds_call_from_sender_account() {
    let script = FakeScript::new()
        .with_result("script.GetAccount", json!({ "sequence": "4" }))
        .with_result("script.CallSmartContract", json!({ "gas_used": "21000", "vm_error": "" }));

    let estimate = eth::estimate_gas(
        &script,
        &config(),
        &[json!({
            "from": address(0xaa),
            "to": address(0xcc),
            "gas": "0x186a0",
            "value": "0x3e8",
            "data": "0x6080",
        })],
    )
    .await
    .unwrap();

    assert_eq!(estimate, json!("0x5a3c"));
    assert_eq!(script.methods_called(), vec!["script.GetAccount", "script.CallSmartContract"]);
    let calls = script.calls();
    assert_eq!(calls[0].1["preview"], json!(true));

    let expected = SmartContractTx {
        from: TxInput {
            address: H160::repeat_byte(0xaa),
            coins: Coins {
                spaywei: BigUint::from(1000u64),
                ..Default::default()
            },
            sequence: 5,
            signature: Vec::new(),
        },
        to: TxOutput {
            address: H160::repeat_byte(0xcc),
            coins: Coins::default(),
        },
        gas_limit: 100_000,
        gas_price: BigUint::from(eth::DEFAULT_GAS_PRICE_WEI),
        data: vec![0x60, 0x80],
    };
    assert_eq!(calls[1].1, json!({ "sctx_bytes": hex::encode(expected.to_bytes()) }));
}

#[tokio::test]
async fn test_estimate_gas_unknown_sender_uses_first_sequence() {
    let script = FakeScript::new()
        .with_error("script.GetAccount", -32000, "Account not found")
        .with_result("script.CallSmartContract", json!({ "gas_used": "21000", "vm_error": "" }));

    eth::estimate_gas(&script, &config(), &[json!({ "from": address(0xaa), "to": address(0xcc) })])
        .await
        .unwrap();

    let sctx_hex = script.calls()[1].1["sctx_bytes"].as_str().unwrap().to_string();
    let bytes = hex::decode(sctx_hex).unwrap();
    assert_eq!(bytes[0], 0x07);
    let from = rlp::Rlp::new(&bytes[1..]).at(0).unwrap();
    assert_eq!(from.val_at::<u64>(2).unwrap(), 1);
}

#[tokio::test]
async fn test_estimate_gas_execution_error() {
    let script = FakeScript::new().with_result(
        "script.CallSmartContract",
        json!({ "gas_used": "0", "vm_error": "evm: execution reverted" }),
    );

    let err = eth::estimate_gas(&script, &config(), &[json!({ "to": address(0xcc) })])
        .await
        .unwrap_err();

    let obj = ErrorObjectOwned::from(err);
    assert_eq!(obj.code(), INTERNAL_ERROR_CODE);
    assert_eq!(obj.message(), "evm: execution reverted");
    assert_eq!(script.call_count("script.GetAccount"), 0);
}
