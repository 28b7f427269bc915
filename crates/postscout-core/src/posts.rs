use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value written to [`PostRecord::time`] when the timestamp could not be read.
///
/// Kept distinct from an empty string so a successfully resolved but blank
/// timestamp can be told apart from an extraction failure.
pub const TIME_FALLBACK: &str = "undefined";

/// One post scraped from a profile's activity feed.
///
/// Every field except `id` has a fallback value that is substituted when the
/// corresponding part of the rendered post cannot be read, so a record is
/// always complete even when the page markup has drifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Platform URN when the post carries one, otherwise a short content hash.
    pub id: String,
    /// Profile link of the post's author; empty when not found.
    pub author: String,
    /// Timestamp text exactly as rendered (e.g. `"3d"`, `"1w • Edited"`).
    pub time: String,
    /// Post body with markup stripped and blank lines removed.
    pub text: String,
    /// Hashtags in order of appearance, duplicates kept.
    pub tags: Vec<String>,
    pub links: Vec<String>,
    pub reactions: u64,
    pub comments: u64,
}

/// The artifact written at the end of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub profile_url: String,
    pub fetched_at: DateTime<Utc>,
    pub total_posts: usize,
    pub posts: Vec<PostRecord>,
}

impl RunReport {
    /// Wraps the collected posts, stamping the current UTC time.
    #[must_use]
    pub fn new(profile_url: impl Into<String>, posts: Vec<PostRecord>) -> Self {
        Self::at(profile_url, Utc::now(), posts)
    }

    /// Same as [`RunReport::new`] with an explicit fetch time.
    #[must_use]
    pub fn at(
        profile_url: impl Into<String>,
        fetched_at: DateTime<Utc>,
        posts: Vec<PostRecord>,
    ) -> Self {
        Self {
            profile_url: profile_url.into(),
            fetched_at,
            total_posts: posts.len(),
            posts,
        }
    }
}
