//! Core Twitter API utilities.
//!
//! This module contains the low-level client that signs and sends requests to the
//! Twitter API. It never retries and never interprets status codes; callers decide
//! which status counts as success.

use log::{debug, error, info};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::TwitterConfig;
use crate::error::{TwitterError, TwitterResult};
use crate::oauth::OAuthSigner;

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!(
            "{}... [truncated, {} total bytes]",
            truncated,
            text.len()
        )
    } else {
        sanitized
    }
}

/// Raw outcome of a signed request: status code and body text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Returns the body if the status equals `expected`, otherwise an
    /// `HTTP <code>: <body>` error carrying the raw body.
    pub fn expect_status(self, expected: StatusCode) -> TwitterResult<String> {
        if self.status == expected {
            Ok(self.body)
        } else {
            Err(TwitterError::Api {
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }
}

/// Twitter REST API client shared by every tool call.
///
/// Holds the process-wide `reqwest::Client` and the credentials. It has no mutable
/// state, so one instance behind an `Arc` serves concurrent tool calls.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Client,
    config: TwitterConfig,
}

impl TwitterClient {
    /// Creates a client for the API at `config.api_url`.
    pub fn new(config: TwitterConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(mut config: TwitterConfig, http: Client) -> Self {
        config.api_url = config.api_url.trim_end_matches('/').to_string();
        TwitterClient { http, config }
    }

    /// Base URL requests are sent to.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Sends one OAuth 1.0a signed request.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `endpoint`: Path below the API base URL, e.g. `/2/tweets`
    /// - `body`: Optional JSON body (not covered by the signature)
    /// - `params`: Query parameters (covered by the signature)
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: Whatever status the API answered with
    /// - `Err(TwitterError)`: If signing fails or the request could not be completed
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        params: &[(String, String)],
    ) -> TwitterResult<ApiResponse> {
        let url = format!("{}{}", self.config.api_url, endpoint);
        info!("Sending {} request to {}", method, url);

        // A fresh signer per call, built from the stored credentials
        let auth_header = OAuthSigner::new(&self.config).sign(method.as_str(), &url, params)?;
        debug!("Request headers: Authorization: OAuth [REDACTED]");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", auth_header);

        if !params.is_empty() {
            debug!("Request query: {:?}", params);
            request = request.query(params);
        }

        if let Some(payload) = body {
            debug!("Request payload: {}", payload);
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed before a response arrived: {}", method, endpoint, e);
            TwitterError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        info!("Received response with status: {} for {} {}", status, method, endpoint);

        if status.is_success() {
            debug!("Response summary for {}: {} bytes received", endpoint, body.len());
        } else {
            error!("{} {} failed - Status: {}", method, endpoint, status);
            debug!(
                "Error response for {}: {}",
                endpoint,
                sanitize_for_logging(&body, 200)
            );
        }

        Ok(ApiResponse { status, body })
    }
}
