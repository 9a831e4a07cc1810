//! Session lifecycle under the façade: exactly-once consumption,
//! abandonment, id reuse, and concurrent in-flight calls.

use serde_json::json;

use confidential_rpc::{
    EncryptionMiddleware, JsonRpcCallResponse, JsonRpcRequest, JsonRpcResponse,
};

use super::support::{SimulatedNode, StaticResolver};

fn call_request(id: u64, data: &str) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: json!(id),
        method: "eth_call".to_string(),
        params: json!([{
            "to": "0xF8bEB8c8Be514772097103e39C2ccE057117CC92",
            "data": data,
        }]),
    }
}

fn gas_response(id: u64) -> JsonRpcResponse {
    JsonRpcResponse::Single(JsonRpcCallResponse {
        jsonrpc: "2.0".to_string(),
        id: json!(id),
        result: Some(json!("0x5b1d")),
        error: None,
    })
}

#[tokio::test]
async fn test_abandon_then_response_passes_through() {
    let node = SimulatedNode::new();
    let mw = EncryptionMiddleware::new(StaticResolver(node.public_key()));

    let mut request = call_request(11, "0x61bc221a");
    mw.on_outbound_request(&mut request).await.unwrap();
    assert_eq!(mw.pending_calls().await, 1);

    // transport cancelled the request upstream
    mw.abandon("11").await;
    assert_eq!(mw.pending_calls().await, 0);
    assert_eq!(mw.marked_payloads().await, 0);

    // a late response for the abandoned id is left alone
    let mut response = gas_response(11);
    mw.on_inbound_response(&mut response).await.unwrap();
    let JsonRpcResponse::Single(single) = response else {
        panic!("expected single response");
    };
    assert_eq!(single.result.unwrap().as_str().unwrap(), "0x5b1d");
}

#[tokio::test]
async fn test_id_reuse_after_completion() {
    let node = SimulatedNode::new();
    let mw = EncryptionMiddleware::new(StaticResolver(node.public_key()));

    let mut first = call_request(1, "0x61bc221a");
    mw.on_outbound_request(&mut first).await.unwrap();
    mw.abandon("1").await;

    // the transport may reuse the id once the prior request completed
    let mut second = call_request(1, "0xa9059cbb");
    mw.on_outbound_request(&mut second).await.unwrap();
    assert_eq!(mw.pending_calls().await, 1);
}

#[tokio::test]
async fn test_concurrent_in_flight_calls() {
    let node = SimulatedNode::new();
    let mw = std::sync::Arc::new(EncryptionMiddleware::new(StaticResolver(node.public_key())));

    let mut handles = Vec::new();
    for i in 0..16u64 {
        let mw = mw.clone();
        handles.push(tokio::spawn(async move {
            let mut request = call_request(i, "0x61bc221a");
            mw.on_outbound_request(&mut request).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(mw.pending_calls().await, 16);
    assert_eq!(mw.marked_payloads().await, 16);

    // each id is released by exactly one abandon
    for i in 0..16u64 {
        mw.abandon(&i.to_string()).await;
    }
    assert_eq!(mw.pending_calls().await, 0);
    assert_eq!(mw.marked_payloads().await, 0);
}

#[tokio::test]
async fn test_string_and_numeric_ids_correlate() {
    let node = SimulatedNode::new();
    let mw = EncryptionMiddleware::new(StaticResolver(node.public_key()));

    let mut request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: json!("req-7"),
        method: "eth_estimateGas".to_string(),
        params: json!([{
            "to": "0xF8bEB8c8Be514772097103e39C2ccE057117CC92",
            "data": "0x61bc221a",
        }]),
    };
    mw.on_outbound_request(&mut request).await.unwrap();

    let mut response = JsonRpcResponse::Single(JsonRpcCallResponse {
        jsonrpc: "2.0".to_string(),
        id: json!("req-7"),
        result: Some(json!("0x5b1d")),
        error: None,
    });
    mw.on_inbound_response(&mut response).await.unwrap();
    assert_eq!(mw.pending_calls().await, 0);
}
