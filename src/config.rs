//! Configuration module for the TrendToThread service.
//!
//! This module contains configuration structures and environment variable handling
//! for the Twitter/X API credentials, the optional ngrok tunnel and the HTTP listener.

use log::{debug, info, warn};
use std::env;

/// Default base URL of the Twitter/X REST API.
pub const DEFAULT_API_URL: &str = "https://api.twitter.com";

/// Default interface the tool server binds to.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default port the tool server listens on.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Configuration struct for Twitter/X API credentials.
///
/// Holds the four OAuth 1.0a User Context secrets used to sign every request to the
/// Twitter/X API v2, plus the API base URL. Unset variables are loaded as empty strings
/// so that [`TwitterConfig::missing_keys`] can report all of them at once.
#[derive(Clone, Default)]
pub struct TwitterConfig {
    /// The API Key (OAuth 1.0a consumer key)
    pub api_key: String,
    /// The API Secret (OAuth 1.0a consumer secret)
    pub api_secret: String,
    /// The Access Token for the authenticated account
    pub access_token: String,
    /// The Access Token Secret for the authenticated account
    pub access_token_secret: String,
    /// Base URL of the Twitter/X API, without trailing slash
    pub api_url: String,
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig")
            .field("api_key", &mask_secret(&self.api_key))
            .field("access_token", &mask_secret(&self.access_token))
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl TwitterConfig {
    /// Creates a new `TwitterConfig` instance by loading credentials from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TWITTER_API_KEY`
    /// - `TWITTER_API_SECRET`
    /// - `TWITTER_ACCESS_TOKEN`
    /// - `TWITTER_ACCESS_TOKEN_SECRET`
    /// - `TWITTER_API_URL` (optional, defaults to `https://api.twitter.com`)
    ///
    /// Loading never fails. Call [`TwitterConfig::validate`] before serving.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trendtothread::TwitterConfig;
    ///
    /// let config = TwitterConfig::from_env();
    /// if !config.validate() {
    ///     eprintln!("Missing credentials: {}", config.missing_keys().join(", "));
    /// }
    /// ```
    pub fn from_env() -> Self {
        info!("Loading Twitter configuration from environment variables");

        let api_url = env::var("TWITTER_API_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let config = TwitterConfig {
            api_key: load_secret("TWITTER_API_KEY"),
            api_secret: load_secret("TWITTER_API_SECRET"),
            access_token: load_secret("TWITTER_ACCESS_TOKEN"),
            access_token_secret: load_secret("TWITTER_ACCESS_TOKEN_SECRET"),
            api_url: api_url.trim_end_matches('/').to_string(),
        };

        debug!("Twitter API base URL: {}", config.api_url);
        config
    }

    /// Returns true iff all four credentials are non-empty.
    pub fn validate(&self) -> bool {
        self.missing_keys().is_empty()
    }

    /// Returns the environment variable names of every empty credential.
    ///
    /// The order is fixed: key, secret, access token, access token secret.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            ("TWITTER_API_KEY", &self.api_key),
            ("TWITTER_API_SECRET", &self.api_secret),
            ("TWITTER_ACCESS_TOKEN", &self.access_token),
            ("TWITTER_ACCESS_TOKEN_SECRET", &self.access_token_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Ngrok configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct NgrokConfig {
    /// Auth token passed to the ngrok agent, empty when unset
    pub auth_token: String,
}

impl NgrokConfig {
    /// Loads `NGROK_AUTH_TOKEN`; unset is treated as empty.
    pub fn from_env() -> Self {
        NgrokConfig {
            auth_token: env::var("NGROK_AUTH_TOKEN").unwrap_or_default(),
        }
    }

    /// Checks if an ngrok auth token is set.
    pub fn is_configured(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

/// Listener configuration for the tool server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

impl ServerConfig {
    /// Loads `SERVER_HOST` and `SERVER_PORT`, falling back to `0.0.0.0:8000`.
    pub fn from_env() -> Self {
        ServerConfig {
            host: get_server_host(),
            port: get_server_port(),
        }
    }

    /// The `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Gets the server host from the `SERVER_HOST` environment variable or returns `0.0.0.0`.
pub fn get_server_host() -> String {
    env::var("SERVER_HOST")
        .ok()
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string())
}

/// Gets the server port from environment variables or returns the default.
///
/// This function reads the `SERVER_PORT` environment variable and parses it as a u16.
/// If the variable is not set it defaults to 8000. A value that cannot be parsed is
/// logged and also replaced by the default.
///
/// # Example
///
/// ```rust
/// use trendtothread::get_server_port;
///
/// // With SERVER_PORT=8080 set in environment
/// let port = get_server_port(); // Returns 8080
///
/// // With no SERVER_PORT set
/// let port = get_server_port(); // Returns 8000
/// ```
pub fn get_server_port() -> u16 {
    match env::var("SERVER_PORT") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                "SERVER_PORT '{}' is not a valid port, using {}",
                raw, DEFAULT_SERVER_PORT
            );
            DEFAULT_SERVER_PORT
        }),
        Err(_) => DEFAULT_SERVER_PORT,
    }
}

/// Reads one secret, logging its presence with the value masked.
fn load_secret(name: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => {
            info!(
                "Found {} environment variable with length: {}",
                name,
                value.len()
            );
            debug!("{} (masked): {}", name, mask_secret(&value));
            value
        }
        Ok(_) => {
            warn!("{} is set but empty", name);
            String::new()
        }
        Err(_) => {
            warn!("No {} found in environment variables", name);
            String::new()
        }
    }
}

/// Masks a secret for logging, keeping at most the first and last eight characters.
pub(crate) fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let length = chars.len();

    let prefix: String = chars.iter().take(8.min(length)).collect();
    if length > 16 {
        let suffix: String = chars[length - 8..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}
