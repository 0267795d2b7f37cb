//! OAuth authentication module for Twitter/X API integration.
//!
//! Every tool call acts on behalf of the account that owns the access token, so all
//! requests are signed with OAuth 1.0a User Context (HMAC-SHA1). The signature covers
//! the HTTP method, the base URL and the query parameters; JSON bodies are not signed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use url::Url;

use crate::config::TwitterConfig;
use crate::error::{TwitterError, TwitterResult};

type HmacSha1 = Hmac<Sha1>;

/// OAuth 1.0a signer for Twitter API requests.
///
/// Built from the four credentials for each request; holds no other state.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("consumer_key", &crate::config::mask_secret(&self.consumer_key))
            .field("access_token", &crate::config::mask_secret(&self.access_token))
            .finish_non_exhaustive()
    }
}

impl OAuthSigner {
    /// Creates a signer from the loaded credentials.
    pub fn new(config: &TwitterConfig) -> Self {
        OAuthSigner {
            consumer_key: config.api_key.clone(),
            consumer_secret: config.api_secret.clone(),
            access_token: config.access_token.clone(),
            access_token_secret: config.access_token_secret.clone(),
        }
    }

    /// Builds the `Authorization` header value for a request.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method (`GET`, `POST`, ...)
    /// - `url`: Request URL; any query string is ignored, pass query parameters in `params`
    /// - `params`: Query parameters that will be sent with the request
    ///
    /// # Returns
    ///
    /// A header of the form `OAuth oauth_consumer_key="...", ..., oauth_version="1.0"`.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> TwitterResult<String> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign_with(method, url, params, &generate_nonce(), &timestamp)
    }

    /// Same as [`OAuthSigner::sign`] with a caller-provided nonce and timestamp.
    pub fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> TwitterResult<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.access_token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        // Parameters are sorted by encoded key, then encoded value
        let mut encoded: Vec<(String, String)> = oauth_params
            .iter()
            .chain(params.iter())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(&base_url(url)?),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.access_token_secret)
        );

        let signature = hmac_sha1(&signing_key, &base_string)?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }
}

/// Percent-encodes per RFC 3986, leaving only `A-Z a-z 0-9 - . _ ~` untouched.
fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Normalizes a URL for the signature base string: no query, no fragment,
/// lowercase scheme and host, default port dropped.
fn base_url(url: &str) -> TwitterResult<String> {
    let mut parsed = Url::parse(url)?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed.to_string())
}

/// Generates a random 32 character hex nonce.
fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Computes HMAC-SHA1 and returns the base64-encoded digest.
fn hmac_sha1(key: &str, data: &str) -> TwitterResult<String> {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| TwitterError::OAuth(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
