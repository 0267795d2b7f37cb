//! Error types for Twitter/X API calls.

use thiserror::Error;

/// Errors raised while talking to the Twitter/X API.
///
/// Tool functions never propagate these; they are rendered with `to_string()` into the
/// `error` field of a failed result.
#[derive(Error, Debug)]
pub enum TwitterError {
    /// Transport failure (DNS, connect, TLS, reading the body)
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON we expected
    #[error("Invalid JSON in Twitter API response: {0}")]
    Json(#[from] serde_json::Error),

    /// OAuth signature generation failed
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// The endpoint URL could not be built
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a status other than the expected one
    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// A successful response lacked a field we rely on
    #[error("Twitter API response is missing '{0}'")]
    MissingField(&'static str),
}

/// Result type for Twitter operations.
pub type TwitterResult<T> = Result<T, TwitterError>;
