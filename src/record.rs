// SPDX-License-Identifier: Apache-2.0

//! Normalized search results.
//!
//! A [`ResultRecord`] is the fixed shape every output format works with,
//! no matter what Reddit actually sent back for a post.

use crate::clock::{self, DateTime, HasAge, Utc};
use crate::filter::Searchable;
use crate::text;
use crate::thing::RawPost;
use serde::{Deserialize, Serialize};

/// Bodies longer than this many characters are truncated.
pub const BODY_LIMIT: usize = 200;

const REDDIT_URL: &str = "https://www.reddit.com";

/// A single post, normalized for output.
///
/// Field names and their order are part of the JSON and CSV output formats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub body: String,
    pub subreddit: String,
    pub score: i64,
    pub comments: i64,
    pub url: String,
    pub created: DateTime<Utc>,
    pub author: String,
}

impl ResultRecord {
    /// Score plus comment count, used to rank search results.
    pub fn engagement(&self) -> i64 {
        self.score.saturating_add(self.comments)
    }
}

impl From<&RawPost> for ResultRecord {
    /// Normalizes a raw post. This never fails: missing fields become
    /// empty strings, zero, or the Unix epoch.
    fn from(post: &RawPost) -> Self {
        let url = if !post.permalink().is_empty() {
            format!("{REDDIT_URL}{}", post.permalink())
        } else {
            post.url().to_string()
        };

        Self {
            title: post.title().to_string(),
            body: text::truncate(post.selftext(), BODY_LIMIT).to_string(),
            subreddit: post.subreddit().to_string(),
            score: post.score(),
            comments: post.num_comments(),
            url,
            created: clock::from_epoch_seconds(post.created_utc()),
            author: post.author().to_string(),
        }
    }
}

impl Searchable for ResultRecord {
    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }
}

impl Searchable for RawPost {
    fn title(&self) -> &str {
        RawPost::title(self)
    }

    fn body(&self) -> &str {
        self.selftext()
    }
}

impl HasAge for ResultRecord {
    fn created_utc(&self) -> DateTime<Utc> {
        self.created
    }
}
