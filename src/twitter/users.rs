//! User lookups for Twitter API.

use log::{info, warn};
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};

use crate::error::TwitterResult;

use super::api::{sanitize_for_logging, TwitterClient};
use super::types::ProfileResult;

const ME_ENDPOINT: &str = "/2/users/me";
const PROFILE_USER_FIELDS: &str = "id,name,username,description,profile_image_url,public_metrics";

/// Gets the profile of the account that owns the access token.
///
/// # Returns
///
/// - `ProfileResult::Found`: On HTTP 200, with the raw `data` object (empty if absent)
/// - `ProfileResult::Failed`: On any other status or transport error
pub async fn get_user_profile(client: &TwitterClient) -> ProfileResult {
    info!("Fetching authenticated user profile");

    match fetch_me(client).await {
        Ok(user) => {
            info!(
                "Fetched profile for @{}",
                user.get("username").and_then(Value::as_str).unwrap_or("?")
            );
            ProfileResult::Found { user }
        }
        Err(e) => {
            warn!(
                "Profile lookup failed: {}",
                sanitize_for_logging(&e.to_string(), 200)
            );
            ProfileResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn fetch_me(client: &TwitterClient) -> TwitterResult<Map<String, Value>> {
    let params = vec![("user.fields".to_string(), PROFILE_USER_FIELDS.to_string())];

    let body = client
        .execute(Method::GET, ME_ENDPOINT, None, &params)
        .await?
        .expect_status(StatusCode::OK)?;

    let mut response: Value = serde_json::from_str(&body)?;
    Ok(match response.get_mut("data").map(Value::take) {
        Some(Value::Object(user)) => user,
        _ => Map::new(),
    })
}
