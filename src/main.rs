//! # TrendToThread
//!
//! Runs the Twitter/X MCP tool server on `SERVER_HOST:SERVER_PORT`.
//!
//! ## Environment Variables
//!
//! - `TWITTER_API_KEY`, `TWITTER_API_SECRET`, `TWITTER_ACCESS_TOKEN`,
//!   `TWITTER_ACCESS_TOKEN_SECRET`: required, the process exits with status 1 otherwise
//! - `SERVER_HOST`: defaults to `0.0.0.0`
//! - `SERVER_PORT`: defaults to 8000
//! - `RUST_LOG`: log filter for `env_logger`
//!
//! ## Example Usage
//!
//! ```bash
//! # Run with default port 8000
//! cargo run
//!
//! # Run on custom port with debug logging
//! SERVER_PORT=8080 RUST_LOG=debug cargo run
//! ```

use std::process::ExitCode;

use log::{error, info};
use trendtothread::{
    require_credentials, serve, shutdown_signal, AppState, ServerConfig, TwitterClient,
    TwitterConfig, TOOL_SIGNATURES,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logging system
    env_logger::init();

    let twitter_config = match require_credentials(TwitterConfig::from_env()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!("Please set the missing environment variables.");
            return ExitCode::from(e.exit_status());
        }
    };

    let server_config = ServerConfig::from_env();
    let base = format!("http://{}", server_config.bind_address());

    println!("{}", "=".repeat(50));
    println!("TrendToThread - Twitter MCP Server");
    println!("{}", "=".repeat(50));
    println!();
    println!("Server running on {}", base);
    println!();
    println!("Endpoints:");
    println!("  MCP:     {}/mcp", base);
    println!("  Health:  {}/health", base);
    println!();
    println!("Available tools:");
    for tool in TOOL_SIGNATURES {
        println!("  - {}", tool);
    }
    println!();
    println!(
        "Use ngrok to expose publicly: ngrok http {} (or run start_with_ngrok)",
        server_config.port
    );
    println!();

    let state = AppState::new(TwitterClient::new(twitter_config));
    info!("Starting TrendToThread server on {}", server_config.bind_address());

    match serve(state, &server_config, shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("HTTP server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
