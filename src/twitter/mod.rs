//! Twitter/X API integration module.
//!
//! This module contains the signed API client and the four operations exposed as
//! tools: posting a tweet, posting a thread, searching recent tweets and fetching
//! the authenticated user's profile.

mod api;
mod search;
mod tweets;
mod types;
mod users;

// Re-export public API
pub use api::{ApiResponse, TwitterClient};
pub use search::{clamp_max_results, search_tweets, DEFAULT_SEARCH_RESULTS};
pub use tweets::{post_thread, post_tweet};
pub use types::{tweet_url, ProfileResult, SearchResult, ThreadResult, TweetResult};
pub use users::get_user_profile;
