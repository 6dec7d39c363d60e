// SPDX-License-Identifier: Apache-2.0

//! Clients for searching the Reddit API.

use crate::http;
use crate::query::SearchRequest;
use crate::reddit::service::{RedditService, Service};
use crate::thing::{Listing, RawPost};
use log::{debug, info};
use std::collections::HashSet;
use thiserror::Error;

/// Anything that can answer a [`SearchRequest`] with raw posts.
///
/// This is the seam between the search pipeline and Reddit: production
/// code uses [`RedditClient`], and tests can substitute a scripted
/// implementation.
pub trait Search {
    /// Runs the search and returns every post it found, de-duplicated but
    /// otherwise unfiltered and in the order Reddit returned them.
    fn search(&self, request: &SearchRequest)
    -> impl Future<Output = Result<Vec<RawPost>, Error>> + Send;
}

/// Searches Reddit through a [`Service`].
#[derive(Debug)]
pub struct RedditClient<S: Service = RedditService> {
    service: S,
}

impl Default for RedditClient<RedditService> {
    fn default() -> Self {
        Self::new(RedditService::default())
    }
}

impl<S: Service + Sync> RedditClient<S> {
    /// Creates a new client that retrieves pages through `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Fetches up to `request.fetch_limit()` posts for one query, following
    /// the pagination cursor for at most `request.max_pages()` pages.
    async fn fetch_query(
        &self,
        request: &SearchRequest,
        keyword: Option<&str>,
    ) -> Result<Vec<RawPost>, Error> {
        let limit = request.fetch_limit() as usize;
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        for page_number in 1..=request.max_pages() {
            let page = request.page(keyword, after.as_deref());
            let body = self.service.get_page(&page).await?;
            let listing = Listing::parse(&body)?;
            debug!(
                "Page {page_number} of {:?} returned {} posts",
                keyword.unwrap_or("<listing>"),
                listing.posts().len()
            );

            let exhausted = listing.is_empty() || listing.after().is_none();
            after = listing.after().map(String::from);
            posts.extend(listing.into_posts());

            if exhausted || posts.len() >= limit {
                break;
            }
        }

        posts.truncate(limit);
        Ok(posts)
    }
}

impl<S: Service + Sync> Search for RedditClient<S> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPost>, Error> {
        let mut seen = HashSet::new();
        let mut posts = Vec::new();

        for keyword in request.queries() {
            for post in self.fetch_query(request, keyword).await? {
                let fresh = match post.key() {
                    Some(key) => seen.insert(key.to_string()),
                    None => true,
                };
                if fresh {
                    posts.push(post);
                }
            }
        }

        info!(
            "Found {} posts in r/{}",
            posts.len(),
            request.subreddit_path()
        );
        Ok(posts)
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] http::HTTPError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
