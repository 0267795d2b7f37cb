//! Public ngrok tunnel for the tool server.
//!
//! The ngrok agent runs as a child process. Its public URL is read from the
//! agent's local inspection API once the tunnel is up. Dropping or shutting down
//! the [`NgrokTunnel`] kills the agent, which closes the tunnel.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;
use tokio::process::{Child, Command};

use crate::config::NgrokConfig;

/// Local inspection API of the ngrok agent.
pub const NGROK_API_URL: &str = "http://127.0.0.1:4040/api/tunnels";

const POLL_ATTEMPTS: u32 = 30;
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum TunnelError {
    #[error("ngrok executable not available: {0}")]
    Unavailable(String),

    #[error("Failed to start ngrok: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ngrok exited before the tunnel came up ({0})")]
    Exited(ExitStatus),

    #[error("ngrok reported no public URL after {0} attempts")]
    NoPublicUrl(u32),
}

/// Checks that the `ngrok` executable runs and returns its version line.
pub async fn check_ngrok_available() -> Result<String, TunnelError> {
    let output = Command::new("ngrok")
        .arg("version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| TunnelError::Unavailable(e.to_string()))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(TunnelError::Unavailable(format!(
            "`ngrok version` failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

/// Picks the URL of the tunnel forwarding to `port`, preferring HTTPS.
///
/// Tunnels owned by another agent, or forwarding elsewhere, are ignored.
pub(crate) fn pick_public_url(response: &Value, port: u16) -> Option<String> {
    let port_suffix = format!(":{}", port);
    let urls: Vec<&str> = response
        .get("tunnels")?
        .as_array()?
        .iter()
        .filter(|tunnel| {
            tunnel
                .pointer("/config/addr")
                .and_then(Value::as_str)
                .is_some_and(|addr| addr.trim_end_matches('/').ends_with(&port_suffix))
        })
        .filter_map(|tunnel| tunnel.get("public_url").and_then(Value::as_str))
        .collect();

    urls.iter()
        .find(|url| url.starts_with("https://"))
        .or_else(|| urls.first())
        .map(|url| url.to_string())
}

/// A running ngrok agent forwarding HTTP traffic to a local port.
#[derive(Debug)]
pub struct NgrokTunnel {
    child: Child,
    public_url: String,
}

impl NgrokTunnel {
    /// Starts `ngrok http <port>` and waits for its public URL.
    ///
    /// The auth token from `config` is handed to the agent through `NGROK_AUTHTOKEN`
    /// when set; otherwise the agent falls back to its own configuration file.
    pub async fn start(port: u16, config: &NgrokConfig) -> Result<Self, TunnelError> {
        Self::start_agent("ngrok", NGROK_API_URL, port, config).await
    }

    pub(crate) async fn start_agent(
        program: &str,
        api_url: &str,
        port: u16,
        config: &NgrokConfig,
    ) -> Result<Self, TunnelError> {
        let port_arg = port.to_string();
        let mut command = Command::new(program);
        command
            .args(["http", port_arg.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // Kept off argv so the token does not show up in `ps`
        if config.is_configured() {
            command.env("NGROK_AUTHTOKEN", &config.auth_token);
        }

        info!("Spawning ngrok agent for port {}", port);
        let mut child = command.spawn()?;

        let http = reqwest::Client::new();
        for attempt in 1..=POLL_ATTEMPTS {
            if let Some(status) = child.try_wait()? {
                return Err(TunnelError::Exited(status));
            }

            match fetch_public_url(&http, api_url, port).await {
                Some(public_url) => {
                    info!("Tunnel established: {}", public_url);
                    return Ok(NgrokTunnel { child, public_url });
                }
                None => debug!("Tunnel not ready (attempt {}/{})", attempt, POLL_ATTEMPTS),
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }

        warn!("Giving up on ngrok after {} attempts", POLL_ATTEMPTS);
        // Best effort: the error below is what the caller needs to see
        let _ = child.kill().await;
        Err(TunnelError::NoPublicUrl(POLL_ATTEMPTS))
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// The MCP endpoint as reachable through the tunnel.
    pub fn mcp_url(&self) -> String {
        format!("{}/mcp", self.public_url.trim_end_matches('/'))
    }

    /// Stops the agent, closing the tunnel.
    pub async fn shutdown(mut self) -> Result<(), TunnelError> {
        info!("Disconnecting tunnel {}", self.public_url);
        self.child.kill().await?;
        Ok(())
    }
}

/// One poll of the inspection API; any failure means "not ready yet".
async fn fetch_public_url(http: &reqwest::Client, api_url: &str, port: u16) -> Option<String> {
    let response = http.get(api_url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let body: Value = response.json().await.ok()?;
    pick_public_url(&body, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_pick_public_url_prefers_https() {
        let response = json!({
            "tunnels": [
                {
                    "proto": "http",
                    "public_url": "http://abc.ngrok-free.app",
                    "config": { "addr": "http://localhost:8000" }
                },
                {
                    "proto": "https",
                    "public_url": "https://abc.ngrok-free.app",
                    "config": { "addr": "http://localhost:8000" }
                }
            ]
        });
        assert_eq!(
            pick_public_url(&response, 8000).as_deref(),
            Some("https://abc.ngrok-free.app")
        );
    }

    #[test]
    fn test_pick_public_url_fallbacks() {
        let http_only = json!({"tunnels": [{
            "public_url": "http://abc.ngrok.io",
            "config": { "addr": "localhost:8000" }
        }]});
        assert_eq!(
            pick_public_url(&http_only, 8000).as_deref(),
            Some("http://abc.ngrok.io")
        );

        assert_eq!(pick_public_url(&json!({"tunnels": []}), 8000), None);
        assert_eq!(pick_public_url(&json!({}), 8000), None);
    }

    #[test]
    fn test_pick_public_url_ignores_other_ports() {
        let response = json!({"tunnels": [
            {
                "public_url": "https://other.ngrok-free.app",
                "config": { "addr": "http://localhost:3000" }
            },
            {
                "public_url": "https://wide.ngrok-free.app",
                "config": { "addr": "http://localhost:18000" }
            },
            { "public_url": "https://unknown.ngrok-free.app" }
        ]});
        assert_eq!(pick_public_url(&response, 8000), None);

        let mixed = json!({"tunnels": [
            {
                "public_url": "https://other.ngrok-free.app",
                "config": { "addr": "http://localhost:3000" }
            },
            {
                "public_url": "https://ours.ngrok-free.app",
                "config": { "addr": "http://localhost:8000" }
            }
        ]});
        assert_eq!(
            pick_public_url(&mixed, 8000).as_deref(),
            Some("https://ours.ngrok-free.app")
        );
    }

    #[tokio::test]
    async fn test_fetch_public_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tunnels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tunnels": [{
                    "proto": "https",
                    "public_url": "https://xyz.ngrok-free.app",
                    "config": { "addr": "http://localhost:8000" }
                }]
            })))
            .mount(&mock_server)
            .await;

        let http = reqwest::Client::new();
        let url = format!("{}/api/tunnels", mock_server.uri());
        assert_eq!(
            fetch_public_url(&http, &url, 8000).await.as_deref(),
            Some("https://xyz.ngrok-free.app")
        );
        assert_eq!(fetch_public_url(&http, &url, 9000).await, None);

        let missing = format!("{}/nope", mock_server.uri());
        assert_eq!(fetch_public_url(&http, &missing, 8000).await, None);
    }

    #[tokio::test]
    async fn test_start_fails_when_agent_cannot_spawn() {
        let result = NgrokTunnel::start_agent(
            "/nonexistent/ngrok",
            "http://127.0.0.1:9/api/tunnels",
            8000,
            &NgrokConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(TunnelError::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_start_ignores_foreign_tunnel_and_reports_exit() {
        let mock_server = MockServer::start().await;

        // Another agent already serves the inspection API, for a different port
        Mock::given(method("GET"))
            .and(path("/api/tunnels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tunnels": [{
                    "public_url": "https://other.ngrok-free.app",
                    "config": { "addr": "http://localhost:3000" }
                }]
            })))
            .mount(&mock_server)
            .await;

        // `true` exits at once, like an agent that cannot bind the inspection port
        let api_url = format!("{}/api/tunnels", mock_server.uri());
        let result =
            NgrokTunnel::start_agent("true", &api_url, 8000, &NgrokConfig::default()).await;
        assert!(matches!(result, Err(TunnelError::Exited(_))));
    }
}
