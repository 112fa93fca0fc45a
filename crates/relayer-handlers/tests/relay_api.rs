// Copyright 2022 Webb Technologies Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use ethers::types::{TxHash, U256};
use serde_json::json;
use tower::ServiceExt;

use pothole_relayer_gateway::mocked::MockGateway;
use pothole_relayer_gateway::VerificationOutcome;
use pothole_relayer_handlers::routes::{
    handle_health, handle_relay_tx, handle_relayer_nonce,
    handle_relayer_status,
};
use pothole_relayer_tx_relay::RelayOrchestrator;

fn test_app(gateway: Arc<MockGateway>) -> Router {
    let orchestrator = Arc::new(RelayOrchestrator::new(gateway));
    Router::new()
        .route("/api/relay", post(handle_relay_tx))
        .route("/api/relay/nonce", get(handle_relayer_nonce))
        .route("/api/relay/status", get(handle_relayer_status))
        .route("/health", get(handle_health))
        .with_state(orchestrator)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(
    app: Router,
    uri: &str,
    body: String,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn relay_payload() -> serde_json::Value {
    json!({
        "request": {
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x2222222222222222222222222222222222222222",
            "value": "0",
            "gas": "100000",
            "deadline": "4102444800",
            "data": "0xdeadbeef",
            "signature": "0x00",
        }
    })
}

#[tokio::test]
async fn nonce_passes_through_the_gateway_value() {
    let gateway =
        Arc::new(MockGateway::builder().nonce(U256::from(42u64)).build());
    let app = test_app(gateway.clone());
    let (status, body) = get_json(
        app,
        "/api/relay/nonce?address=0x1111111111111111111111111111111111111111",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "nonce": "42" }));
    assert_eq!(gateway.nonce_calls(), 1);
}

#[tokio::test]
async fn missing_address_parameter_is_a_client_error() {
    let app = test_app(Arc::new(MockGateway::builder().build()));
    let (status, body) = get_json(app, "/api/relay/nonce").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing address parameter" }));
}

#[tokio::test]
async fn unparseable_address_fails_like_any_other_nonce_read() {
    let app = test_app(Arc::new(MockGateway::builder().build()));
    let (status, body) =
        get_json(app, "/api/relay/nonce?address=not-an-address").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to get nonce" }));
}

#[tokio::test]
async fn relay_happy_path_returns_the_tx_hash() {
    let gateway = Arc::new(MockGateway::builder().build());
    let app = test_app(gateway.clone());
    let (status, body) =
        post_json(app, "/api/relay", relay_payload().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["txHash"],
        json!(format!("{:?}", TxHash::repeat_byte(0x42)))
    );
    assert_eq!(gateway.execute_calls(), 1);
}

#[tokio::test]
async fn relay_rejects_missing_request_object() {
    let app = test_app(Arc::new(MockGateway::builder().build()));
    let (status, body) =
        post_json(app, "/api/relay", json!({}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Invalid request format" })
    );
}

#[tokio::test]
async fn relay_rejects_undeserializable_bodies() {
    let app = test_app(Arc::new(MockGateway::builder().build()));
    let (status, body) =
        post_json(app, "/api/relay", "pothole".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Invalid request format" })
    );
}

#[tokio::test]
async fn relay_rejects_incomplete_requests() {
    let gateway = Arc::new(MockGateway::builder().build());
    let app = test_app(gateway.clone());
    let mut payload = relay_payload();
    payload["request"].as_object_mut().unwrap().remove("gas");
    let (status, body) =
        post_json(app, "/api/relay", payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Invalid request format" })
    );
    assert_eq!(gateway.verify_calls(), 0);
}

#[tokio::test]
async fn relay_surfaces_an_invalid_signature() {
    let gateway = Arc::new(
        MockGateway::builder()
            .verification(VerificationOutcome::Invalid)
            .build(),
    );
    let app = test_app(gateway);
    let (status, body) =
        post_json(app, "/api/relay", relay_payload().to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Invalid signature" })
    );
}

#[tokio::test]
async fn relay_surfaces_an_underfunded_relayer() {
    let gateway = Arc::new(
        MockGateway::builder()
            .balance(U256::exp10(15) * 5)
            .build(),
    );
    let app = test_app(gateway);
    let (status, body) =
        post_json(app, "/api/relay", relay_payload().to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Insufficient relayer balance" })
    );
}

#[tokio::test]
async fn status_reports_the_relayer_identity() {
    let app = test_app(Arc::new(MockGateway::builder().build()));
    let (status, body) = get_json(app, "/api/relay/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("active"));
    assert_eq!(body["chainId"], json!(31337));
    let balance = body["balance"].as_str().unwrap();
    assert!(balance.ends_with(" ETH"), "got balance {balance}");
    assert!(balance.starts_with("1.0"), "got balance {balance}");
    assert!(body["relayerAddress"]
        .as_str()
        .unwrap()
        .starts_with("0x"));
    assert!(body["forwarderAddress"]
        .as_str()
        .unwrap()
        .starts_with("0x"));
}

#[tokio::test]
async fn health_is_always_ok() {
    let app = test_app(Arc::new(MockGateway::builder().build()));
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["service"], json!("pothole-relayer"));
    assert!(body["timestamp"].is_string());
}
