use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use std::process::Output;
use tokio::net::TcpListener;
use tokio::process::Command;

const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const SPL_TOKEN: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

async fn ledger(Json(body): Json<Value>) -> Json<Value> {
    let result = match body["method"].as_str().unwrap_or_default() {
        "getAccountInfo" => json!({ "context": { "slot": 1 }, "value": { "owner": SPL_TOKEN } }),
        "getTokenLargestAccounts" => json!({
            "context": { "slot": 1 },
            "value": [
                { "address": "acc1", "amount": "2500000", "decimals": 6, "uiAmountString": "2.5" },
                { "address": "acc2", "amount": "1000000", "decimals": 6, "uiAmountString": "1" }
            ]
        }),
        "getMultipleAccounts" => json!({
            "context": { "slot": 1 },
            "value": [
                { "data": { "parsed": { "info": { "owner": "walletA" } } } },
                { "data": { "parsed": { "info": { "owner": "walletB" } } } }
            ]
        }),
        other => panic!("unexpected method {other}"),
    };
    Json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

async fn spawn_ledger() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let app = Router::new().route("/", post(ledger));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    url
}

async fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_probe-holders"))
        .args(args)
        .env_remove("SOLANA_RPC_URL")
        .env_remove("HOLDERS_EAGER_PROGRAM_LOOKUP")
        .env("RUST_LOG", "off")
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn missing_mint_exits_with_1() {
    let output = run_cli(&["--limit", "3"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing --mint"));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn unreachable_rpc_exits_with_2() {
    // Nothing listens on the discard port.
    let output = run_cli(&["--mint", MINT, "--rpc", "http://127.0.0.1:9/"]).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Probe error:"));
}

#[tokio::test]
async fn prints_ranked_json_on_success() {
    let url = spawn_ledger().await;

    let output = run_cli(&["--mint", MINT, "--limit", "2", "--rpc", &url]).await;

    assert_eq!(output.status.code(), Some(0), "{}", String::from_utf8_lossy(&output.stderr));
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["mint"], MINT);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["rpcUrl"], url);
    assert_eq!(
        body["holders"],
        json!([
            { "owner": "walletA", "amountRaw": "2500000", "decimals": 6, "uiAmount": "2.5" },
            { "owner": "walletB", "amountRaw": "1000000", "decimals": 6, "uiAmount": "1" }
        ])
    );
}

#[tokio::test]
async fn table_output_on_success() {
    let url = spawn_ledger().await;

    let output = run_cli(&["--mint", MINT, "--rpc", &url, "--table"]).await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("walletA"));
    assert!(stdout.contains("2.50"));
}
