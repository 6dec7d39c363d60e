// SPDX-License-Identifier: Apache-2.0

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. This
//! module wraps the JSON for posts ("links", kind `t3`) loosely enough
//! that a post with odd or missing fields never fails to load.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A post exactly as Reddit returned it.
///
/// Every accessor is total: a missing, null, or wrongly-typed field reads
/// as an empty string, zero, or `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPost {
    data: Map<String, Value>,
}

impl RawPost {
    fn str_field(&self, key: &str) -> &str {
        self.data.get(key).and_then(Value::as_str).unwrap_or("")
    }

    fn int_field(&self, key: &str) -> i64 {
        match self.data.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// The post's base-36 ID, e.g. `1abcd2`.
    pub fn id(&self) -> Option<&str> {
        self.data
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn title(&self) -> &str {
        self.str_field("title")
    }

    /// Body of a self post; empty for link posts.
    pub fn selftext(&self) -> &str {
        self.str_field("selftext")
    }

    pub fn subreddit(&self) -> &str {
        self.str_field("subreddit")
    }

    pub fn score(&self) -> i64 {
        self.int_field("score")
    }

    pub fn num_comments(&self) -> i64 {
        self.int_field("num_comments")
    }

    /// Path of the post's comment page, relative to reddit.com.
    pub fn permalink(&self) -> &str {
        self.str_field("permalink")
    }

    /// Link target of the post (the comment page itself for self posts).
    pub fn url(&self) -> &str {
        self.str_field("url")
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn created_utc(&self) -> Option<f64> {
        self.data.get("created_utc").and_then(Value::as_f64)
    }

    pub fn author(&self) -> &str {
        self.str_field("author")
    }

    /// A key that identifies the post across queries, if it has one.
    pub fn key(&self) -> Option<&str> {
        self.id().or_else(|| Some(self.permalink()).filter(|p| !p.is_empty()))
    }
}

impl From<Map<String, Value>> for RawPost {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// One page of posts from a listing or search endpoint.
#[derive(Debug, Default)]
pub struct Listing {
    posts: Vec<RawPost>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ThingData>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThingData {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl Listing {
    /// Parses a JSON response from a listing or search endpoint.
    ///
    /// Fails only if the envelope itself is malformed. Children that are
    /// not posts are skipped.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let envelope: ListingEnvelope = serde_json::from_str(json)?;
        let posts = envelope
            .data
            .children
            .into_iter()
            .filter(|child| child.kind.is_empty() || child.kind == "t3")
            .filter_map(|child| match child.data {
                Value::Object(data) => Some(RawPost::from(data)),
                _ => None,
            })
            .collect();
        let after = envelope.data.after.filter(|after| !after.is_empty());
        Ok(Self { posts, after })
    }

    pub fn posts(&self) -> &[RawPost] {
        &self.posts
    }

    /// Consumes the listing, returning its posts.
    pub fn into_posts(self) -> Vec<RawPost> {
        self.posts
    }

    /// Cursor for the next page, or `None` if this is the last page.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
