//! HTTP route handlers for the TrendToThread service.
//!
//! This module contains all the HTTP route handler functions that process
//! incoming requests and return appropriate responses.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::warn;
use serde_json::{json, Value};

use crate::mcp::{self, JsonRpcRequest, JsonRpcResponse, INVALID_REQUEST, PARSE_ERROR};
use crate::server::AppState;

/// Handles GET requests to the root `/` endpoint.
///
/// # Returns
///
/// A static string naming the service and its MCP endpoint.
pub async fn handle_root() -> &'static str {
    "TrendToThread Twitter MCP server. POST JSON-RPC messages to /mcp."
}

/// Handles GET requests to the `/health` endpoint.
///
/// This endpoint provides a health check for the service, returning the current
/// status and service name. It does not contact the Twitter API.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "trendtothread"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "trendtothread"}))
}

/// Handles POST requests to the `/mcp` endpoint.
///
/// Each request body holds exactly one JSON-RPC message.
///
/// # Responses
///
/// - `200 OK` with a JSON-RPC response for requests (including JSON-RPC errors)
/// - `202 Accepted` with an empty body for notifications
/// - `400 Bad Request` with a JSON-RPC error if the body is not valid JSON or not a
///   single JSON-RPC message
pub async fn handle_mcp(State(state): State<AppState>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Rejecting unparseable MCP message: {}", e);
            return rpc_error(StatusCode::BAD_REQUEST, PARSE_ERROR, format!("Parse error: {}", e));
        }
    };

    if message.is_array() {
        return rpc_error(
            StatusCode::BAD_REQUEST,
            INVALID_REQUEST,
            "Batch requests are not supported".to_string(),
        );
    }

    let request: JsonRpcRequest = match serde_json::from_value(message) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting malformed JSON-RPC message: {}", e);
            return rpc_error(
                StatusCode::BAD_REQUEST,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            );
        }
    };

    match mcp::dispatch(&state.twitter, request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn rpc_error(status: StatusCode, code: i64, message: String) -> Response {
    (status, Json(JsonRpcResponse::error(Value::Null, code, message))).into_response()
}
