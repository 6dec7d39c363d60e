// SPDX-License-Identifier: Apache-2.0

//! Builds search requests for the Reddit API.
//!
//! A [`SearchRequest`] describes *what* to look for: which subreddits,
//! which keywords, how far back, in what order, and how many posts. It
//! knows how to turn itself into one or more [`PageRequest`]s, which
//! describe the actual endpoints and query strings sent to Reddit.

use crate::error::Error;
use clap::ValueEnum;
use log::warn;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// The largest page Reddit will return for a single listing request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The most pages that will be fetched for a single query.
///
/// Reddit stops paginating listings at around 1,000 items anyway, so
/// there is no point in asking for more than this.
pub const MAX_PAGES: u32 = 10;

/// The fewest posts fetched for each query, however small the limit.
///
/// Reddit's search also matches comments, flair, and URLs, so some of what
/// it returns will not mention the keyword in the title or body. Fetching
/// a larger pool leaves enough posts to fill the limit after filtering.
pub const MIN_FETCH: u32 = 50;

static SUBREDDIT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{2,21}$").expect("invalid subreddit regex"));

/// Restricts a search to posts created within a relative window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TimeFilter {
    /// The past hour.
    Hour,

    /// The past day.
    Day,

    /// The past week.
    Week,

    /// The past month.
    #[default]
    Month,

    /// The past year.
    Year,

    /// No restriction.
    All,
}

impl TimeFilter {
    /// The value of the `t` query parameter for this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ranking applied to search results by Reddit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Sort {
    /// Most relevant to the search query.
    Relevance,

    /// Currently popular.
    Hot,

    /// Highest score.
    Top,

    /// Most recently created.
    #[default]
    New,

    /// Most commented.
    Comments,
}

impl Sort {
    /// The value of the `sort` query parameter for this ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Relevance => "relevance",
            Sort::Hot => "hot",
            Sort::Top => "top",
            Sort::New => "new",
            Sort::Comments => "comments",
        }
    }

    /// The subreddit listing that best approximates this ordering when
    /// there is no search query to rank against.
    fn listing(&self) -> &'static str {
        match self {
            Sort::Relevance | Sort::Hot => "hot",
            Sort::Top | Sort::Comments => "top",
            Sort::New => "new",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single HTTP request for one page of results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    path: String,
    params: Vec<(&'static str, String)>,
}

impl PageRequest {
    /// Path of the endpoint, relative to the API host.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string parameters.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of the query parameter `name`, if it is set.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A validated search against one or more subreddits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    subreddits: Vec<String>,
    keywords: Vec<String>,
    time_filter: TimeFilter,
    sort: Sort,
    limit: u32,
}

impl SearchRequest {
    /// Incrementally builds a search of the given `subreddits`.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscout::query::{SearchRequest, Sort, TimeFilter};
    /// let request = SearchRequest::build(["rust", "learnrust"])
    ///     .keywords(["borrow checker"])
    ///     .time_filter(TimeFilter::Week)
    ///     .sort(Sort::Top)
    ///     .limit(50)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.subreddit_path(), "rust+learnrust");
    /// assert_eq!(request.page_size(), 50);
    /// assert_eq!(request.fetch_limit(), 50);
    /// ```
    pub fn build<I, S>(subreddits: I) -> SearchRequestBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchRequestBuilder {
            subreddits: subreddits.into_iter().map(Into::into).collect(),
            ..SearchRequestBuilder::default()
        }
    }

    /// A request for the newest posts in `subreddits`, one full page at a
    /// time, with no server-side keyword query.
    pub fn newest<I, S>(subreddits: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(subreddits)
            .sort(Sort::New)
            .time_filter(TimeFilter::All)
            .limit(MAX_PAGE_SIZE)
            .build()
    }

    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn time_filter(&self) -> TimeFilter {
        self.time_filter
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// The maximum number of posts requested.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Subreddits joined the way Reddit expects them in a path
    /// (`"rust+learnrust"`).
    pub fn subreddit_path(&self) -> String {
        self.subreddits.join("+")
    }

    /// Number of posts requested per page, clamped to [`MAX_PAGE_SIZE`].
    pub fn page_size(&self) -> u32 {
        self.fetch_limit().min(MAX_PAGE_SIZE)
    }

    /// Number of posts fetched per query before filtering: the limit, but
    /// never fewer than [`MIN_FETCH`].
    pub fn fetch_limit(&self) -> u32 {
        self.limit.max(MIN_FETCH)
    }

    /// Number of pages needed to fetch [`fetch_limit()`](Self::fetch_limit)
    /// posts, capped at [`MAX_PAGES`].
    pub fn max_pages(&self) -> u32 {
        self.fetch_limit().div_ceil(self.page_size()).min(MAX_PAGES)
    }

    /// The server-side queries this request expands to.
    ///
    /// Each keyword is searched for separately; with no keywords a single
    /// listing of the subreddits is requested instead.
    pub fn queries(&self) -> Vec<Option<&str>> {
        if self.keywords.is_empty() {
            vec![None]
        } else {
            self.keywords.iter().map(|k| Some(k.as_str())).collect()
        }
    }

    /// Describes the HTTP request for one page of results.
    ///
    /// `keyword` is the search query (`None` for a plain listing) and
    /// `after` is the pagination cursor returned with the previous page.
    pub fn page(&self, keyword: Option<&str>, after: Option<&str>) -> PageRequest {
        let subreddits = self.subreddit_path();
        let mut params = Vec::with_capacity(7);

        let path = match keyword {
            Some(query) => {
                params.push(("q", query.to_string()));
                params.push(("restrict_sr", "1".to_string()));
                params.push(("sort", self.sort.to_string()));
                params.push(("t", self.time_filter.to_string()));
                format!("/r/{subreddits}/search.json")
            }
            None => {
                let listing = self.sort.listing();
                if listing == "top" {
                    params.push(("t", self.time_filter.to_string()));
                }
                format!("/r/{subreddits}/{listing}.json")
            }
        };

        params.push(("limit", self.page_size().to_string()));
        params.push(("raw_json", "1".to_string()));
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }

        PageRequest { path, params }
    }
}

/// A builder for search requests.
///
/// You probably don't want to use this directly; call
/// [`SearchRequest::build()`] and construct it incrementally instead.
#[derive(Debug)]
#[must_use]
pub struct SearchRequestBuilder {
    subreddits: Vec<String>,
    keywords: Vec<String>,
    time_filter: TimeFilter,
    sort: Sort,
    limit: u32,
}

impl Default for SearchRequestBuilder {
    fn default() -> Self {
        Self {
            subreddits: vec![],
            keywords: vec![],
            time_filter: TimeFilter::default(),
            sort: Sort::default(),
            limit: 20,
        }
    }
}

impl SearchRequestBuilder {
    /// Sets the keywords to search for. Blank keywords are ignored.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn time_filter(mut self, time_filter: TimeFilter) -> Self {
        self.time_filter = time_filter;
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Finalizes the [`SearchRequest`].
    ///
    /// Returns a configuration error if no subreddits were given, if a
    /// subreddit name is not valid, or if the limit is zero.
    pub fn build(self) -> Result<SearchRequest, Error> {
        if self.subreddits.is_empty() {
            return Err(Error::Configuration(
                "at least one subreddit is required".to_string(),
            ));
        }

        if let Some(name) = self
            .subreddits
            .iter()
            .find(|name| !SUBREDDIT_NAME.is_match(name))
        {
            return Err(Error::Configuration(format!(
                "invalid subreddit name: {name:?}"
            )));
        }

        if self.limit == 0 {
            return Err(Error::Configuration(
                "limit must be greater than zero".to_string(),
            ));
        }

        if self.limit > MAX_PAGE_SIZE * MAX_PAGES {
            warn!(
                "limit of {} exceeds the {} posts Reddit will page through; results will be capped",
                self.limit,
                MAX_PAGE_SIZE * MAX_PAGES
            );
        }

        Ok(SearchRequest {
            subreddits: self.subreddits,
            keywords: self.keywords,
            time_filter: self.time_filter,
            sort: self.sort,
            limit: self.limit,
        })
    }
}
