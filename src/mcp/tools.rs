//! The four Twitter tools: schemas for `tools/list` and dispatch for `tools/call`.

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::twitter::{
    get_user_profile, post_thread, post_tweet, search_tweets, TwitterClient,
    DEFAULT_SEARCH_RESULTS,
};

/// Protocol-level failures of a tool call. Twitter failures are not errors here;
/// they come back as a result with `success: false`.
#[derive(Error, Debug, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },
}

#[derive(Debug, Deserialize)]
struct PostTweetParams {
    text: String,
    #[serde(default)]
    reply_to_tweet_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostThreadParams {
    tweets: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchTweetsParams {
    query: String,
    #[serde(default)]
    max_results: Option<i64>,
}

/// Serialized outcome of a tool plus whether the Twitter call succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub success: bool,
    pub value: Value,
    /// `value` rendered as JSON text, keeping the result's field order
    pub text: String,
}

impl ToolOutput {
    fn from_result<T: Serialize>(result: &T, success: bool) -> Self {
        match (serde_json::to_value(result), serde_json::to_string(result)) {
            (Ok(value), Ok(text)) => ToolOutput {
                success,
                value,
                text,
            },
            (Err(e), _) | (_, Err(e)) => {
                let value = json!({
                    "success": false,
                    "error": format!("Failed to encode result: {}", e)
                });
                ToolOutput {
                    success: false,
                    text: value.to_string(),
                    value,
                }
            }
        }
    }

    /// The MCP `tools/call` result: the JSON as text content plus structured content.
    pub fn into_call_result(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "structuredContent": self.value,
            "isError": !self.success,
        })
    }
}

/// Tool descriptors returned by `tools/list`.
pub fn tool_definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "post_tweet",
            "description": "Post a single tweet to Twitter/X. Pass reply_to_tweet_id to reply to an existing tweet.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The tweet content (max 280 characters)"
                    },
                    "reply_to_tweet_id": {
                        "type": "string",
                        "description": "Optional tweet ID to reply to (for creating threads)"
                    }
                },
                "required": ["text"]
            }
        }),
        json!({
            "name": "post_thread",
            "description": "Post a Twitter thread: each tweet is posted as a reply to the previous one. Stops at the first failure.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tweets": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Tweet texts in thread order (each max 280 characters)"
                    }
                },
                "required": ["tweets"]
            }
        }),
        json!({
            "name": "search_tweets",
            "description": "Search tweets from the last seven days.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (supports Twitter search operators)"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of tweets to return (10-100, default 10)",
                        "default": DEFAULT_SEARCH_RESULTS
                    }
                },
                "required": ["query"]
            }
        }),
        json!({
            "name": "get_user_profile",
            "description": "Get the authenticated user's Twitter profile.",
            "inputSchema": { "type": "object", "properties": {} }
        }),
    ]
}

fn parse_arguments<T: DeserializeOwned>(
    tool: &'static str,
    arguments: Value,
) -> Result<T, ToolError> {
    // A missing arguments object is treated like an empty one
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool,
        message: e.to_string(),
    })
}

/// Runs the named tool against the Twitter API.
pub async fn call_tool(
    client: &TwitterClient,
    name: &str,
    arguments: Value,
) -> Result<ToolOutput, ToolError> {
    info!("Tool call: {}", name);

    match name {
        "post_tweet" => {
            let params: PostTweetParams = parse_arguments("post_tweet", arguments)?;
            let parent = params.reply_to_tweet_id.as_deref().filter(|id| !id.is_empty());
            let result = post_tweet(client, &params.text, parent).await;
            Ok(ToolOutput::from_result(&result, result.is_success()))
        }
        "post_thread" => {
            let params: PostThreadParams = parse_arguments("post_thread", arguments)?;
            let result = post_thread(client, &params.tweets).await;
            Ok(ToolOutput::from_result(&result, result.is_success()))
        }
        "search_tweets" => {
            let params: SearchTweetsParams = parse_arguments("search_tweets", arguments)?;
            let result = search_tweets(client, &params.query, params.max_results).await;
            Ok(ToolOutput::from_result(&result, result.is_success()))
        }
        "get_user_profile" => {
            let result = get_user_profile(client).await;
            Ok(ToolOutput::from_result(&result, result.is_success()))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
