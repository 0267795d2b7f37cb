//! TrendToThread ngrok launcher
//!
//! Starts the Twitter MCP server and exposes it through an ngrok tunnel so remote
//! agents and low-code platforms can reach it. Requires the `ngrok` executable on
//! `PATH`. Press Ctrl+C to stop both the server and the tunnel.

use std::process::ExitCode;

use trendtothread::{
    open_tunnel, require_credentials, require_ngrok, serve, shutdown_signal, AppState,
    NgrokConfig, ServerConfig, TwitterClient, TwitterConfig, TOOL_SIGNATURES,
};

fn rule() -> String {
    "=".repeat(55)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    println!("{}", rule());
    println!("  TrendToThread - Twitter MCP Server with Ngrok");
    println!("{}", rule());
    println!();

    println!("[1/4] Checking Twitter credentials...");
    let twitter_config = match require_credentials(TwitterConfig::from_env()) {
        Ok(config) => config,
        Err(e) => {
            println!("      ERROR: {}", e);
            println!();
            println!("      Please set your Twitter API credentials in the environment.");
            return ExitCode::from(e.exit_status());
        }
    };
    println!("      Twitter credentials OK");

    println!("[2/4] Checking ngrok...");
    let ngrok_config = NgrokConfig::from_env();
    match require_ngrok().await {
        Ok(version) => println!("      ngrok is available ({})", version),
        Err(e) => {
            println!("      ERROR: {}", e);
            println!("      Install ngrok: https://ngrok.com/download");
            return ExitCode::from(e.exit_status());
        }
    }
    if ngrok_config.is_configured() {
        println!("      Using ngrok auth token from NGROK_AUTH_TOKEN");
    }

    let server_config = ServerConfig::from_env();
    println!("[3/4] Starting ngrok tunnel on port {}...", server_config.port);
    let tunnel = match open_tunnel(server_config.port, &ngrok_config).await {
        Ok(tunnel) => {
            println!("      Tunnel established: {}", tunnel.public_url());
            tunnel
        }
        Err(e) => {
            println!("      ERROR: {}", e);
            println!();
            println!("      You may need to authenticate ngrok first:");
            println!("        ngrok config add-authtoken YOUR_AUTH_TOKEN");
            println!();
            println!("      Or set NGROK_AUTH_TOKEN in the environment");
            println!("      Get your token at:");
            println!("        https://dashboard.ngrok.com/get-started/your-authtoken");
            return ExitCode::from(e.exit_status());
        }
    };

    println!("[4/4] Server ready!");
    println!();
    println!("{}", rule());
    println!("  MCP SERVER CONFIGURATION");
    println!("{}", rule());
    println!();
    println!("  Name:        TrendToThread Twitter MCP");
    println!("  Description: Post tweets and threads to Twitter/X");
    println!();
    println!("  Endpoint:");
    println!("    MCP: {}", tunnel.mcp_url());
    println!();
    println!("  Headers (JSON):");
    println!("  {{");
    println!("    \"Content-Type\": \"application/json\",");
    println!("    \"Accept\": \"application/json, text/event-stream\"");
    println!("  }}");
    println!();
    println!("{}", rule());
    println!();
    println!("Available tools:");
    for tool in TOOL_SIGNATURES {
        println!("  - {}", tool);
    }
    println!();
    println!("Press Ctrl+C to stop the server");
    println!();

    let state = AppState::new(TwitterClient::new(twitter_config));
    let served = serve(state, &server_config, shutdown_signal()).await;

    println!();
    println!("Shutting down...");
    if let Err(e) = tunnel.shutdown().await {
        log::warn!("Failed to stop ngrok cleanly: {}", e);
    }
    println!("Server stopped.");

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("HTTP server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
