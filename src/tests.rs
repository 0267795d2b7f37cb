//! # Tests Module
//!
//! Integration tests that drive the axum router end-to-end without binding a socket.
//! The Twitter API is replaced by a `wiremock` server, so tool calls exercise the
//! whole path: HTTP request → JSON-RPC dispatch → tool → signed API request.

use crate::{
    config::{get_server_port, TwitterConfig},
    handlers::{handle_health, handle_root},
    server::{build_router, AppState},
    twitter::TwitterClient,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_json, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Creates a test application whose Twitter client points at `api_url`.
fn create_test_app(api_url: String) -> Router {
    let client = TwitterClient::new(TwitterConfig {
        api_key: "test_api_key".into(),
        api_secret: "test_api_secret".into(),
        access_token: "test_access_token".into(),
        access_token_secret: "test_access_token_secret".into(),
        api_url,
    });
    build_router(AppState::new(client))
}

/// Creates a test application that must never reach the Twitter API.
fn create_offline_app() -> Router {
    create_test_app("http://127.0.0.1:9".into())
}

fn mcp_request(body: Value) -> Request<Body> {
    Request::builder()
        .uri("/mcp")
        .method("POST")
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Sends a `tools/call` and returns the structured tool result.
async fn call_tool(app: Router, name: &str, arguments: Value) -> Value {
    let response = app
        .oneshot(mcp_request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    let result = &json_response["result"];

    // The text content always mirrors the structured content
    let text = result["content"][0]["text"].as_str().unwrap();
    let from_text: Value = serde_json::from_str(text).unwrap();
    assert_eq!(from_text, result["structuredContent"]);

    result["structuredContent"].clone()
}

#[tokio::test]
async fn test_handle_root() {
    let response = handle_root().await;
    assert!(response.contains("/mcp"));
}

#[tokio::test]
async fn test_handle_health() {
    let Json(json_response): Json<Value> = handle_health().await;

    assert_eq!(json_response["status"], "healthy");
    assert_eq!(json_response["service"], "trendtothread");
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = create_offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    assert_eq!(json_response["status"], "healthy");
}

#[tokio::test]
async fn test_mcp_initialize_endpoint() {
    let response = create_offline_app()
        .oneshot(mcp_request(json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    assert_eq!(json_response["jsonrpc"], "2.0");
    assert_eq!(json_response["id"], 0);
    assert_eq!(json_response["result"]["serverInfo"]["name"], "TrendToThread");
    assert_eq!(json_response["result"]["protocolVersion"], "2025-03-26");
}

#[tokio::test]
async fn test_mcp_notification_is_accepted() {
    let response = create_offline_app()
        .oneshot(mcp_request(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_mcp_rejects_malformed_messages() {
    let request = Request::builder()
        .uri("/mcp")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = create_offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"]["code"], -32700);

    let response = create_offline_app()
        .oneshot(mcp_request(json!({"jsonrpc": "2.0", "id": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"]["code"], -32600);

    let response = create_offline_app()
        .oneshot(mcp_request(json!([{"jsonrpc": "2.0", "id": 1, "method": "ping"}])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mcp_null_id_gets_an_error_response() {
    let response = create_offline_app()
        .oneshot(mcp_request(json!({"jsonrpc": "2.0", "id": null, "method": "ping"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = read_json(response).await;
    assert_eq!(json_response["id"], Value::Null);
    assert_eq!(json_response["error"]["code"], -32600);
}

#[tokio::test]
async fn test_mcp_get_is_not_allowed() {
    let request = Request::builder()
        .uri("/mcp")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = create_offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_tools_list_endpoint() {
    let response = create_offline_app()
        .oneshot(mcp_request(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/list"
        })))
        .await
        .unwrap();

    let json_response = read_json(response).await;
    let names: Vec<&str> = json_response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["post_tweet", "post_thread", "search_tweets", "get_user_profile"]
    );
}

#[tokio::test]
async fn test_post_thread_tool_without_tweets() {
    let result = call_tool(create_offline_app(), "post_thread", json!({"tweets": []})).await;
    assert_eq!(result, json!({"success": false, "error": "No tweets provided"}));
}

#[tokio::test]
async fn test_post_thread_tool_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(header_exists("Authorization"))
        .and(body_json(json!({"text": "1/2 Rust threads"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "100", "text": "1/2"}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(body_json(json!({
            "text": "2/2 are sequential",
            "reply": { "in_reply_to_tweet_id": "100" }
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "101", "text": "2/2"}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = call_tool(
        create_test_app(mock_server.uri()),
        "post_thread",
        json!({"tweets": ["1/2 Rust threads", "2/2 are sequential"]}),
    )
    .await;

    assert_eq!(
        result,
        json!({
            "success": true,
            "thread_url": "https://twitter.com/i/status/100",
            "tweet_ids": ["100", "101"],
            "tweets_posted": 2
        })
    );
}

#[tokio::test]
async fn test_search_tweets_tool_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "1", "text": "rustacean" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = call_tool(
        create_test_app(mock_server.uri()),
        "search_tweets",
        json!({"query": "rust", "max_results": 5}),
    )
    .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["count"], 1);
    assert_eq!(result["tweets"][0]["text"], "rustacean");
}

#[tokio::test]
async fn test_get_user_profile_tool_reports_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let app = create_test_app(mock_server.uri());
    let response = app
        .oneshot(mcp_request(json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": { "name": "get_user_profile" }
        })))
        .await
        .unwrap();

    let json_response = read_json(response).await;
    assert_eq!(json_response["result"]["isError"], true);
    assert_eq!(
        json_response["result"]["structuredContent"],
        json!({"success": false, "error": "HTTP 401: Unauthorized"})
    );
}

/// Unit test for the get_server_port function.
///
/// Verifies the default, a custom value and the fallback for garbage, and cleans up
/// the environment afterwards.
#[test]
fn test_get_server_port() {
    std::env::remove_var("SERVER_PORT");
    assert_eq!(get_server_port(), 8000);

    std::env::set_var("SERVER_PORT", "8080");
    assert_eq!(get_server_port(), 8080);

    std::env::set_var("SERVER_PORT", "not-a-port");
    assert_eq!(get_server_port(), 8000);

    std::env::remove_var("SERVER_PORT");
}
