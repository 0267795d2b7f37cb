//! Tweet search functionality for Twitter API.
//!
//! This module contains the recent-search call used by the `search_tweets` tool.

use log::{info, warn};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::error::TwitterResult;

use super::api::{sanitize_for_logging, TwitterClient};
use super::types::SearchResult;

const SEARCH_ENDPOINT: &str = "/2/tweets/search/recent";
const SEARCH_TWEET_FIELDS: &str = "created_at,author_id,public_metrics";

/// Smallest `max_results` the recent-search endpoint accepts.
pub const MIN_SEARCH_RESULTS: i64 = 10;
/// Largest `max_results` the recent-search endpoint accepts.
pub const MAX_SEARCH_RESULTS: i64 = 100;
/// `max_results` used when the caller does not ask for a specific count.
pub const DEFAULT_SEARCH_RESULTS: i64 = 10;

/// Forces a requested result count into `[10, 100]`.
///
/// Counts below 10 are raised to 10 even when the caller explicitly asked for fewer.
pub fn clamp_max_results(requested: i64) -> i64 {
    requested.clamp(MIN_SEARCH_RESULTS, MAX_SEARCH_RESULTS)
}

/// Searches tweets from the last seven days.
///
/// # Parameters
///
/// - `client`: The signed API client
/// - `query`: Search query; operator syntax is passed to the API untouched
/// - `max_results`: Requested result count, clamped into `[10, 100]` (default 10)
///
/// # Returns
///
/// - `SearchResult::Found`: On HTTP 200, with the raw tweet objects from `data`
///   (empty when the API returns no `data` field)
/// - `SearchResult::Failed`: On any other status or transport error
pub async fn search_tweets(
    client: &TwitterClient,
    query: &str,
    max_results: Option<i64>,
) -> SearchResult {
    let effective = clamp_max_results(max_results.unwrap_or(DEFAULT_SEARCH_RESULTS));
    info!(
        "Searching recent tweets for '{}' (max_results: {})",
        sanitize_for_logging(query, 100),
        effective
    );

    match fetch_recent(client, query, effective).await {
        Ok(tweets) => {
            info!("Search returned {} tweets", tweets.len());
            SearchResult::Found { tweets }
        }
        Err(e) => {
            warn!("Search failed: {}", sanitize_for_logging(&e.to_string(), 200));
            SearchResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn fetch_recent(
    client: &TwitterClient,
    query: &str,
    max_results: i64,
) -> TwitterResult<Vec<Value>> {
    let params = vec![
        ("query".to_string(), query.to_string()),
        ("max_results".to_string(), max_results.to_string()),
        ("tweet.fields".to_string(), SEARCH_TWEET_FIELDS.to_string()),
    ];

    let body = client
        .execute(Method::GET, SEARCH_ENDPOINT, None, &params)
        .await?
        .expect_status(StatusCode::OK)?;

    let mut response: Value = serde_json::from_str(&body)?;
    Ok(match response.get_mut("data").map(Value::take) {
        Some(Value::Array(tweets)) => tweets,
        _ => Vec::new(),
    })
}
