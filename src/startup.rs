//! Startup checks shared by the server and launcher binaries.
//!
//! Each check returns a [`StartupError`] instead of exiting, so the binaries only
//! print it and turn [`StartupError::exit_status`] into the process exit code.

use log::error;
use thiserror::Error;

use crate::config::{NgrokConfig, TwitterConfig};
use crate::tunnel::{check_ngrok_available, NgrokTunnel, TunnelError};

/// Exit status used for every startup failure.
pub const STARTUP_FAILURE: u8 = 1;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Missing Twitter API credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error(transparent)]
    Tunnel(#[from] TunnelError),
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_status(&self) -> u8 {
        match self {
            StartupError::MissingCredentials(_) | StartupError::Tunnel(_) => STARTUP_FAILURE,
        }
    }
}

/// Passes `config` through when all four credentials are set.
pub fn require_credentials(config: TwitterConfig) -> Result<TwitterConfig, StartupError> {
    let missing = config.missing_keys();
    if missing.is_empty() {
        Ok(config)
    } else {
        error!("Missing Twitter API credentials: {}", missing.join(", "));
        Err(StartupError::MissingCredentials(missing))
    }
}

/// Checks the ngrok executable and returns its version line.
pub async fn require_ngrok() -> Result<String, StartupError> {
    Ok(check_ngrok_available().await?)
}

/// Starts the tunnel for `port`.
pub async fn open_tunnel(port: u16, config: &NgrokConfig) -> Result<NgrokTunnel, StartupError> {
    Ok(NgrokTunnel::start(port, config).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> TwitterConfig {
        TwitterConfig {
            api_key: "key".into(),
            api_secret: "secret".into(),
            access_token: "token".into(),
            access_token_secret: "token_secret".into(),
            api_url: "https://api.twitter.com".into(),
        }
    }

    #[test]
    fn test_require_credentials_passes_complete_config() {
        let config = require_credentials(credentials()).unwrap();
        assert_eq!(config.api_key, "key");
    }

    #[test]
    fn test_missing_credentials_exit_with_failure() {
        let mut config = credentials();
        config.api_secret.clear();
        config.access_token.clear();

        let err = require_credentials(config).unwrap_err();
        assert_eq!(err.exit_status(), STARTUP_FAILURE);
        assert_eq!(
            err.to_string(),
            "Missing Twitter API credentials: TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN"
        );
    }

    #[tokio::test]
    async fn test_failed_tunnel_exits_with_failure() {
        let tunnel = NgrokTunnel::start_agent(
            "/nonexistent/ngrok",
            "http://127.0.0.1:9/api/tunnels",
            8000,
            &NgrokConfig::default(),
        )
        .await;

        let err = StartupError::from(tunnel.unwrap_err());
        assert!(matches!(err, StartupError::Tunnel(TunnelError::Spawn(_))));
        assert_eq!(err.exit_status(), STARTUP_FAILURE);
        assert!(err.to_string().starts_with("Failed to start ngrok"));
    }
}
