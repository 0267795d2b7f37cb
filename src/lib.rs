//! # TrendToThread Library
//!
//! A Model Context Protocol (MCP) tool server for Twitter/X. It exposes four tools to
//! AI agents and low-code platforms, all signed with OAuth 1.0a User Context:
//!
//! - `post_tweet(text, reply_to_tweet_id?)`
//! - `post_thread(tweets)`: each tweet replies to the previous one
//! - `search_tweets(query, max_results?)`
//! - `get_user_profile()`
//!
//! ## Configuration
//!
//! - `TWITTER_API_KEY`, `TWITTER_API_SECRET`, `TWITTER_ACCESS_TOKEN`,
//!   `TWITTER_ACCESS_TOKEN_SECRET`: required
//! - `SERVER_HOST`: listen address (defaults to `0.0.0.0`)
//! - `SERVER_PORT`: listen port (defaults to 8000)
//! - `NGROK_AUTH_TOKEN`: optional, used by the `start_with_ngrok` binary
//!
//! ## API Endpoints
//!
//! - `GET /`: Returns a short banner
//! - `GET /health`: Returns service health status
//! - `POST /mcp`: MCP JSON-RPC endpoint (`initialize`, `tools/list`, `tools/call`, `ping`)

pub mod config;
pub mod error;
pub mod handlers;
pub mod mcp;
pub mod oauth;
pub mod server;
pub mod startup;
pub mod tunnel;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{get_server_host, get_server_port, NgrokConfig, ServerConfig, TwitterConfig};
pub use error::{TwitterError, TwitterResult};
pub use handlers::{handle_health, handle_mcp, handle_root};
pub use server::{build_router, serve, shutdown_signal, AppState};
pub use startup::{open_tunnel, require_credentials, require_ngrok, StartupError};
pub use tunnel::{check_ngrok_available, NgrokTunnel, TunnelError};
pub use twitter::{
    get_user_profile, post_thread, post_tweet, search_tweets, ProfileResult, SearchResult,
    ThreadResult, TweetResult, TwitterClient,
};

/// Tool list printed by both binaries.
pub const TOOL_SIGNATURES: &[&str] = &[
    "post_tweet(text, reply_to_tweet_id?)",
    "post_thread(tweets[])",
    "search_tweets(query, max_results?)",
    "get_user_profile()",
];

#[cfg(test)]
mod tests;
