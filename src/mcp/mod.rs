//! MCP (Model Context Protocol) layer.
//!
//! Stateless JSON-RPC handling for the streamable HTTP transport: every POST to
//! `/mcp` carries one message and is answered on its own, so no session is kept.

mod protocol;
mod tools;

use log::{debug, warn};
use serde_json::{json, Value};

use crate::twitter::TwitterClient;

pub use protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST,
    JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use tools::{call_tool, tool_definitions, ToolError, ToolOutput};

pub const SERVER_NAME: &str = "TrendToThread";
pub const SERVER_INSTRUCTIONS: &str =
    "Twitter MCP Server - Post tweets, threads, and search Twitter";

/// Protocol revisions this server speaks, oldest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];
const DEFAULT_PROTOCOL_VERSION: &str = "2025-03-26";

/// Picks the client's requested protocol version if supported, otherwise ours.
fn negotiate_protocol_version(params: Option<&Value>) -> &'static str {
    params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .and_then(|requested| {
            SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .copied()
                .find(|v| *v == requested)
        })
        .unwrap_or(DEFAULT_PROTOCOL_VERSION)
}

fn initialize_result(params: Option<&Value>) -> Value {
    json!({
        "protocolVersion": negotiate_protocol_version(params),
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        },
        "instructions": SERVER_INSTRUCTIONS
    })
}

/// Handles one JSON-RPC message.
///
/// Returns `None` for notifications, which get no response body.
pub async fn dispatch(client: &TwitterClient, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        debug!("Notification received: {}", request.method);
        return None;
    }

    let id = request.id.clone().unwrap_or(Value::Null);

    if id.is_null() {
        warn!("Rejecting {} request with a null id", request.method);
        return Some(JsonRpcResponse::error(
            id,
            INVALID_REQUEST,
            "id must be a string or a number",
        ));
    }

    if request.jsonrpc != JSONRPC_VERSION {
        warn!("Rejecting message with jsonrpc version '{}'", request.jsonrpc);
        return Some(JsonRpcResponse::error(
            id,
            INVALID_REQUEST,
            "jsonrpc must be \"2.0\"",
        ));
    }

    debug!("Request {}: {}", id, request.method);

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(id, initialize_result(request.params.as_ref())),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            let Some(name) = params.get("name").and_then(Value::as_str) else {
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    "tools/call requires a tool name",
                ));
            };
            let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

            match call_tool(client, name, arguments).await {
                Ok(output) => JsonRpcResponse::success(id, output.into_call_result()),
                Err(e) => {
                    warn!("Rejected tool call: {}", e);
                    JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string())
                }
            }
        }
        other => {
            warn!("Unknown method: {}", other);
            JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other))
        }
    };

    Some(response)
}
