//! Result types returned by the Twitter tools.
//!
//! Each tool yields a tagged enum. On the wire they serialize to flat JSON objects
//! carrying a `success` flag, which is what tool-calling clients consume.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Canonical status URL for a tweet.
pub fn tweet_url(tweet_id: &str) -> String {
    format!("https://twitter.com/i/status/{}", tweet_id)
}

/// Outcome of `post_tweet`.
#[derive(Debug, Clone, PartialEq)]
pub enum TweetResult {
    Posted { tweet_id: String, tweet_url: String },
    Failed { error: String },
}

impl TweetResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TweetResult::Posted { .. })
    }
}

impl Serialize for TweetResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TweetResult::Posted {
                tweet_id,
                tweet_url,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("tweet_id", tweet_id)?;
                map.serialize_entry("tweet_url", tweet_url)?;
                map.end()
            }
            TweetResult::Failed { error } => serialize_failure(serializer, error),
        }
    }
}

/// Outcome of `post_thread`.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadResult {
    /// Every tweet was posted; ids are in posting order.
    Posted { tweet_ids: Vec<String> },
    /// Nothing was attempted.
    Failed { error: String },
    /// Tweets up to `failed_at - 1` were posted, tweet `failed_at` (1-based) failed,
    /// and the rest were never attempted.
    Partial {
        tweet_ids: Vec<String>,
        failed_at: usize,
        error: String,
    },
}

impl ThreadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ThreadResult::Posted { .. })
    }

    /// Ids of the tweets that made it, in posting order.
    pub fn tweet_ids(&self) -> &[String] {
        match self {
            ThreadResult::Posted { tweet_ids } | ThreadResult::Partial { tweet_ids, .. } => {
                tweet_ids
            }
            ThreadResult::Failed { .. } => &[],
        }
    }

    /// URL of the first tweet of a fully posted thread.
    pub fn thread_url(&self) -> Option<String> {
        match self {
            ThreadResult::Posted { tweet_ids } => tweet_ids.first().map(|id| tweet_url(id)),
            _ => None,
        }
    }
}

impl Serialize for ThreadResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ThreadResult::Posted { tweet_ids } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("thread_url", &self.thread_url())?;
                map.serialize_entry("tweet_ids", tweet_ids)?;
                map.serialize_entry("tweets_posted", &tweet_ids.len())?;
                map.end()
            }
            ThreadResult::Failed { error } => serialize_failure(serializer, error),
            ThreadResult::Partial {
                tweet_ids,
                failed_at,
                error,
            } => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("tweets_posted", &tweet_ids.len())?;
                map.serialize_entry("tweet_ids", tweet_ids)?;
                map.serialize_entry("failed_at", failed_at)?;
                map.serialize_entry(
                    "error",
                    &format!("Failed at tweet {}: {}", failed_at, error),
                )?;
                map.end()
            }
        }
    }
}

/// Outcome of `search_tweets`. Tweets are passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Found { tweets: Vec<Value> },
    Failed { error: String },
}

impl SearchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchResult::Found { tweets } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("tweets", tweets)?;
                map.serialize_entry("count", &tweets.len())?;
                map.end()
            }
            SearchResult::Failed { error } => serialize_failure(serializer, error),
        }
    }
}

/// Outcome of `get_user_profile`. The profile object is passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileResult {
    Found { user: Map<String, Value> },
    Failed { error: String },
}

impl ProfileResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProfileResult::Found { .. })
    }
}

impl Serialize for ProfileResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfileResult::Found { user } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("user", user)?;
                map.end()
            }
            ProfileResult::Failed { error } => serialize_failure(serializer, error),
        }
    }
}

fn serialize_failure<S: Serializer>(serializer: S, error: &str) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("success", &false)?;
    map.serialize_entry("error", error)?;
    map.end()
}
