use crate::clock::{Clock, DateTime, Utc};
use crate::http::{HTTPError, HTTPResult};
use crate::query::{PageRequest, SearchRequest};
use crate::record::ResultRecord;
use crate::reddit::client::{self, Search};
use crate::reddit::service::Service;
use crate::thing::RawPost;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    let filename = format!("tests/data/{file}.json");
    fs::read_to_string(&filename).unwrap_or_else(|_| panic!("could not load test data from {filename}"))
}

/// Builds a raw post from a JSON object literal.
pub fn raw_post(value: Value) -> RawPost {
    match value {
        Value::Object(data) => RawPost::from(data),
        other => panic!("raw posts must be JSON objects, not {other}"),
    }
}

/// A listing page holding `posts`, each a JSON object of post fields,
/// with `after` as its pagination cursor.
pub fn listing(posts: impl IntoIterator<Item = Value>, after: Option<&str>) -> String {
    let children: Vec<Value> = posts
        .into_iter()
        .map(|data| json!({ "kind": "t3", "data": data }))
        .collect();
    json!({ "kind": "Listing", "data": { "after": after, "children": children } }).to_string()
}

/// A record from r/weddingplanning created at 2025-01-01T12:00:00Z.
pub fn record(title: &str, body: &str, score: i64, comments: i64) -> ResultRecord {
    ResultRecord {
        title: title.to_string(),
        body: body.to_string(),
        subreddit: "weddingplanning".to_string(),
        score,
        comments,
        url: "https://www.reddit.com/r/weddingplanning/comments/x/".to_string(),
        created: DateTime::from_timestamp(1735732800, 0).unwrap(),
        author: "planner".to_string(),
    }
}

/// A Reddit service that answers each request with the next fixture file
/// from `tests/data`, then with an empty listing once they run out.
pub struct TestService {
    responses: Mutex<VecDeque<HTTPResult<String>>>,
    pages: Mutex<Vec<PageRequest>>,
}

impl TestService {
    pub fn new<'a>(files: impl IntoIterator<Item = &'a str>) -> Self {
        Self::from_pages(files.into_iter().map(load_data))
    }

    /// A service that answers with each of `pages`, in order.
    pub fn from_pages(pages: impl IntoIterator<Item = String>) -> Self {
        Self {
            responses: Mutex::new(pages.into_iter().map(Ok).collect()),
            pages: Mutex::new(vec![]),
        }
    }

    pub fn failing(error: HTTPError) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(error)])),
            pages: Mutex::new(vec![]),
        }
    }

    /// Every page requested so far, in order.
    pub fn requested_pages(&self) -> Vec<PageRequest> {
        self.pages.lock().unwrap().clone()
    }
}

impl Service for TestService {
    async fn get_page(&self, page: &PageRequest) -> HTTPResult<String> {
        self.pages.lock().unwrap().push(page.clone());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(load_data("empty")))
    }
}

/// A search client that returns scripted results, one per call, then
/// empty results once they run out.
pub struct MockSearch {
    responses: Mutex<VecDeque<Result<Vec<RawPost>, client::Error>>>,
}

impl MockSearch {
    pub fn new(responses: impl IntoIterator<Item = Result<Vec<RawPost>, client::Error>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }

    pub fn failing() -> Self {
        Self::new([Err(HTTPError::Http(StatusCode::INTERNAL_SERVER_ERROR).into())])
    }
}

impl Search for MockSearch {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<RawPost>, client::Error> {
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(vec![]))
    }
}

pub struct FrozenClock {
    datetime: DateTime<Utc>,
}

impl Default for FrozenClock {
    fn default() -> Self {
        let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00-07:00")
            .expect("invalid date supplied")
            .with_timezone(&Utc);
        Self { datetime }
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.datetime
    }
}
