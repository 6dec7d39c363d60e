// SPDX-License-Identifier: Apache-2.0

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit.

use crate::http::{HTTPError, HTTPResult, HTTPService};
use crate::query::PageRequest;
use crate::reddit::auth::Credentials;
use log::{debug, trace, warn};
use reqwest::{Client, header};
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const PUBLIC_BASE: &str = "https://www.reddit.com";
const OAUTH_BASE: &str = "https://oauth.reddit.com";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Tokens are refreshed this long before Reddit says they expire.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

/// A service for retrieving pages of posts from Reddit.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Performs a GET request for the given page and returns the raw
    /// JSON body.
    fn get_page(&self, page: &PageRequest) -> impl Future<Output = HTTPResult<String>> + Send;
}

#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "TokenResponse::default_expiry")]
    expires_in: u64,
}

impl TokenResponse {
    fn default_expiry() -> u64 {
        3600
    }

    /// When a token received at `now` should be refreshed, or `None` if its
    /// lifetime is too large to represent.
    fn refresh_at(&self, now: Instant) -> Option<Instant> {
        let lifetime = Duration::from_secs(self.expires_in).saturating_sub(TOKEN_SLACK);
        now.checked_add(lifetime)
    }
}

/// A service that contacts the Reddit API directly to retrieve information.
///
/// Without credentials, requests go to the public `www.reddit.com`
/// endpoints. With credentials, an app-only OAuth token is fetched on
/// first use, cached until shortly before it expires, and requests go to
/// `oauth.reddit.com`.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
    credentials: Option<Credentials>,
    token: Mutex<Option<AccessToken>>,
}

impl HTTPService for RedditService {}

impl Default for RedditService {
    /// Creates a new anonymous Reddit service.
    fn default() -> Self {
        Self::new(None)
    }
}

impl RedditService {
    /// Creates a new Reddit service, authenticating with `credentials`
    /// if they are given.
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            client: Self::client(),
            credentials,
            token: Mutex::new(None),
        }
    }

    fn base_url(&self) -> &'static str {
        if self.credentials.is_some() {
            OAUTH_BASE
        } else {
            PUBLIC_BASE
        }
    }

    fn uri(&self, page: &PageRequest) -> String {
        format!("{}{}", self.base_url(), page.path())
    }

    fn cached_token(&self) -> Option<String> {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        token
            .as_ref()
            .filter(|token| token.expires_at > Instant::now())
            .map(|token| token.value.clone())
    }

    async fn access_token(&self) -> HTTPResult<Option<String>> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };
        if let Some(token) = self.cached_token() {
            return Ok(Some(token));
        }

        debug!("Requesting a new OAuth token");
        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(HTTPError::Http(resp.status()));
        }
        let token: TokenResponse = resp.json().await.map_err(HTTPError::Body)?;

        match token.refresh_at(Instant::now()) {
            Some(expires_at) => {
                *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(AccessToken {
                    value: token.access_token.clone(),
                    expires_at,
                });
            }
            None => warn!(
                "Not caching OAuth token with an expiry of {}s",
                token.expires_in
            ),
        }
        Ok(Some(token.access_token))
    }
}

impl Service for RedditService {
    async fn get_page(&self, page: &PageRequest) -> HTTPResult<String> {
        let token = self.access_token().await?;
        let uri = self.uri(page);
        debug!("GET {uri} {:?}", page.params());

        let mut request = self.client.get(&uri).query(page.params());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        trace!("{uri} returned {}", resp.status());

        if !resp.status().is_success() {
            Err(HTTPError::Http(resp.status()))
        } else {
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .ok_or(HTTPError::MissingContentType)?
                .to_str()?;
            if !content_type.starts_with("application/json") {
                Err(HTTPError::UnexpectedContentType(content_type.to_string()))
            } else {
                resp.text().await.map_err(HTTPError::Body)
            }
        }
    }
}
