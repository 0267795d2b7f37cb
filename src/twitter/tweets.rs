//! Tweet operations for Twitter API.
//!
//! This module contains functions for posting single tweets and reply-chained
//! threads using the Twitter API v2.

use log::{debug, info, warn};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use crate::error::{TwitterError, TwitterResult};

use super::api::{sanitize_for_logging, TwitterClient};
use super::types::{tweet_url, ThreadResult, TweetResult};

const TWEETS_ENDPOINT: &str = "/2/tweets";

/// Builds the JSON body for `POST /2/tweets`.
fn tweet_payload(text: &str, reply_to_tweet_id: Option<&str>) -> Value {
    let mut payload = json!({ "text": text });
    if let Some(parent) = reply_to_tweet_id {
        payload["reply"] = json!({ "in_reply_to_tweet_id": parent });
    }
    payload
}

/// Posts a tweet to Twitter/X using the API v2 endpoint.
///
/// The text is sent as is; length limits are enforced by the API, not here.
///
/// # Parameters
///
/// - `client`: The signed API client
/// - `text`: The text content of the tweet to post
/// - `reply_to_tweet_id`: Optional ID of the tweet this one replies to
///
/// # Returns
///
/// - `TweetResult::Posted`: On HTTP 201, with the new tweet ID and its status URL
/// - `TweetResult::Failed`: On any other status (`HTTP <code>: <body>`) or transport error
///
/// # Example
///
/// ```rust,no_run
/// use trendtothread::{post_tweet, TwitterClient, TwitterConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let client = TwitterClient::new(TwitterConfig::from_env());
///     let result = post_tweet(&client, "Hello from Rust!", None).await;
///     println!("{}", serde_json::to_string(&result).unwrap());
/// }
/// ```
pub async fn post_tweet(
    client: &TwitterClient,
    text: &str,
    reply_to_tweet_id: Option<&str>,
) -> TweetResult {
    match reply_to_tweet_id {
        Some(parent) => info!(
            "Posting reply to tweet {}: '{}'",
            parent,
            sanitize_for_logging(text, 80)
        ),
        None => info!("Posting tweet: '{}'", sanitize_for_logging(text, 80)),
    }

    match create_tweet(client, text, reply_to_tweet_id).await {
        Ok(tweet_id) => {
            info!("Tweet {} posted successfully", tweet_id);
            TweetResult::Posted {
                tweet_url: tweet_url(&tweet_id),
                tweet_id,
            }
        }
        Err(e) => {
            warn!("Failed to post tweet: {}", sanitize_for_logging(&e.to_string(), 200));
            TweetResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn create_tweet(
    client: &TwitterClient,
    text: &str,
    reply_to_tweet_id: Option<&str>,
) -> TwitterResult<String> {
    let payload = tweet_payload(text, reply_to_tweet_id);
    let body = client
        .execute(Method::POST, TWEETS_ENDPOINT, Some(&payload), &[])
        .await?
        .expect_status(StatusCode::CREATED)?;

    let response: Value = serde_json::from_str(&body)?;
    response
        .get("data")
        .and_then(|data| data.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(TwitterError::MissingField("data.id"))
}

/// Posts a thread: each tweet replies to the one posted before it.
///
/// Tweets are posted strictly one after another because every request needs the
/// ID returned by the previous one. The first failure stops the thread; tweets
/// already posted stay up and are reported in the result.
///
/// # Returns
///
/// - `ThreadResult::Failed`: If `tweets` is empty (no request is made)
/// - `ThreadResult::Partial`: If tweet `n` failed, with the IDs of tweets `1..n`
/// - `ThreadResult::Posted`: With every ID in posting order
pub async fn post_thread(client: &TwitterClient, tweets: &[String]) -> ThreadResult {
    if tweets.is_empty() {
        warn!("post_thread called without tweets");
        return ThreadResult::Failed {
            error: "No tweets provided".to_string(),
        };
    }

    info!("Posting thread of {} tweets", tweets.len());
    let mut tweet_ids: Vec<String> = Vec::with_capacity(tweets.len());

    for (index, text) in tweets.iter().enumerate() {
        let parent = tweet_ids.last().map(String::as_str);
        debug!("Posting tweet {}/{} (parent: {:?})", index + 1, tweets.len(), parent);

        match post_tweet(client, text, parent).await {
            TweetResult::Posted { tweet_id, .. } => tweet_ids.push(tweet_id),
            TweetResult::Failed { error } => {
                warn!(
                    "Thread stopped at tweet {} after {} posted",
                    index + 1,
                    tweet_ids.len()
                );
                return ThreadResult::Partial {
                    tweet_ids,
                    failed_at: index + 1,
                    error,
                };
            }
        }
    }

    info!("Thread posted: {} tweets", tweet_ids.len());
    ThreadResult::Posted { tweet_ids }
}
