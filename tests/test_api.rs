
use std::sync::Arc;

use alloy::primitives::U256;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use token_ranker::address::checksum;
use token_ranker::api::{router, state::AppState};
use token_ranker::node::NodeError;

use mock_common::*;

fn app(node: MockNode, explorer: MockExplorer) -> Router {
    router(AppState::new(service(Arc::new(node), Arc::new(explorer))))
}

fn default_app() -> Router {
    let node = MockNode::default()
        .with_balance(holder(0xa), tokens(5))
        .with_balance(holder(0xb), tokens(10))
        .with_balance(holder(0xc), U256::ZERO)
        .with_failure(holder(0xd), NodeError::Transport("connection refused".into()));
    app(node, MockExplorer::unconfigured())
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let (status, body) = send(default_app(), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_get_balance() {
    let uri = format!("/get_balance?address={}", lower(holder(0xa)));
    let (status, body) = send(default_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], json!(checksum(&holder(0xa))));
    assert_eq!(body["balance"], json!(5.0));
    assert_eq!(body["raw_balance"], json!("5000000000000000000"));
    assert_eq!(body["symbol"], json!("TBY"));
}

#[tokio::test]
async fn test_get_balance_invalid_address_is_400() {
    let (status, body) = send(default_app(), get("/get_balance?address=0x123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid address"));
    assert_eq!(body["detail"], body["error"]);
}

#[tokio::test]
async fn test_get_balance_upstream_down_is_500() {
    let uri = format!("/get_balance?address={}", lower(holder(0xd)));
    let (status, body) = send(default_app(), get(&uri)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_get_balance_batch_mixed() {
    let req = post(
        "/get_balance_batch",
        json!({ "addresses": [lower(holder(0xb)), "nope", lower(holder(0xd))] }),
    );
    let (status, body) = send(default_app(), req).await;
    assert_eq!(status, StatusCode::OK);

    let balances = body["balances"].as_array().unwrap();
    assert_eq!(balances.len(), 3);
    assert_eq!(balances[0]["balance"], json!(10.0));
    assert_eq!(balances[1]["address"], "nope");
    assert!(balances[1]["error"].is_string());
    assert_eq!(balances[2]["address"], json!(lower(holder(0xd))));
    assert!(balances[2]["error"].is_string());
}

#[tokio::test]
async fn test_get_top() {
    let req = post(
        "/get_top",
        json!({
            "addresses": [lower(holder(0xa)), lower(holder(0xb)), lower(holder(0xc))],
            "n": 2
        }),
    );
    let (status, body) = send(default_app(), req).await;
    assert_eq!(status, StatusCode::OK);

    let top = body["top"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["address"], json!(checksum(&holder(0xb))));
    assert_eq!(top[0]["balance"], json!(10.0));
    assert_eq!(top[0]["raw"], json!("10000000000000000000"));
    assert!(top[0].get("last_transaction_date").is_none());
    assert_eq!(top[1]["address"], json!(checksum(&holder(0xa))));
}

#[tokio::test]
async fn test_get_top_defaults_n() {
    let addresses: Vec<String> = (1..=12u8).map(|i| lower(holder(i))).collect();
    for body in [json!({ "addresses": addresses }), json!({ "addresses": addresses, "n": 0 })] {
        let (status, resp) = send(default_app(), post("/get_top", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["top"].as_array().unwrap().len(), 10);
    }
}

#[tokio::test]
async fn test_get_top_with_transactions_without_key() {
    let req = post(
        "/get_top_with_transactions",
        json!({ "addresses": [lower(holder(0xa)), lower(holder(0xb))] }),
    );
    let (status, body) = send(default_app(), req).await;
    assert_eq!(status, StatusCode::OK);

    let top = body["top"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    for entry in top {
        assert_eq!(entry["last_transaction_date"], Value::Null);
    }
}

#[tokio::test]
async fn test_get_top_with_transactions_dates() {
    let node = MockNode::default().with_balance(holder(1), tokens(1));
    let explorer = MockExplorer::configured().with(holder(1), Scripted::Found(1_700_000_000));
    let req = post(
        "/get_top_with_transactions",
        json!({ "addresses": [lower(holder(1))], "n": 1 }),
    );
    let (status, body) = send(app(node, explorer), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["top"][0]["last_transaction_date"], "2023-11-14T22:13:20Z");
}

#[tokio::test]
async fn test_get_token_info_field_names() {
    let (status, body) = send(default_app(), get("/get_token_info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "TBY");
    assert_eq!(body["name"], "Test Token");
    assert_eq!(body["decimals"], 18);
    assert_eq!(body["totalSupply"], json!(1_000_000.0));
    assert_eq!(body["raw_totalSupply"], json!(tokens(1_000_000).to_string()));
    assert_eq!(body["address"], json!(checksum(&TOKEN)));
}

#[tokio::test]
async fn test_call_contract_bad_abi_is_400() {
    let req = post(
        "/call_contract",
        json!({
            "contract_address": lower(TOKEN),
            "abi": [{ "type": "function", "name": 42 }],
            "method": "totalSupply"
        }),
    );
    let (status, body) = send(default_app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid ABI"));
}

#[tokio::test]
async fn test_call_contract_node_refusal_is_400() {
    let req = post(
        "/call_contract",
        json!({
            "contract_address": lower(TOKEN),
            "abi": [{
                "type": "function",
                "name": "totalSupply",
                "inputs": [],
                "outputs": [{ "name": "", "type": "uint256" }],
                "stateMutability": "view"
            }],
            "method": "totalSupply",
            "args": [],
            "kwargs": {}
        }),
    );
    let (status, body) = send(default_app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Contract call failed"));
}

#[tokio::test]
async fn test_call_contract_with_address_array_arg() {
    let req = post(
        "/call_contract",
        json!({
            "contract_address": lower(TOKEN),
            "abi": [{
                "type": "function",
                "name": "balancesOf",
                "inputs": [{ "name": "owners", "type": "address[]" }],
                "outputs": [{ "name": "", "type": "uint256[]" }],
                "stateMutability": "view"
            }],
            "method": "balancesOf",
            "args": [[lower(holder(1)), lower(holder(2))]]
        }),
    );
    let (status, body) = send(default_app(), req).await;
    // Arguments encode; the mock node then refuses eth_call.
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("eth_call"), "{error}");
    assert!(!error.contains("param"), "{error}");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let req = Request::builder()
        .method("POST")
        .uri("/get_top")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = default_app().oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());
}
