// SPDX-License-Identifier: Apache-2.0

//! One-shot searches: fetch, filter, normalize, rank.

use crate::error::Error;
use crate::filter::KeywordSet;
use crate::query::SearchRequest;
use crate::record::ResultRecord;
use crate::reddit::Search;
use log::debug;

/// Runs `request` against `client` and returns the matching posts.
///
/// Reddit's own search also matches comments, flair, and URLs, so every
/// post is checked again against the request's keywords (in its title and
/// full body) before it is normalized. Results are ranked by engagement,
/// highest first, and only then cut to the request's limit.
pub async fn search<S: Search>(client: &S, request: &SearchRequest) -> Result<Vec<ResultRecord>, Error> {
    let keywords = KeywordSet::new(request.keywords());
    let posts = client.search(request).await?;
    let fetched = posts.len();

    let mut records: Vec<ResultRecord> = posts
        .iter()
        .filter(|post| keywords.matches(*post))
        .map(ResultRecord::from)
        .collect();
    debug!("{} of {fetched} posts matched {:?}", records.len(), request.keywords());

    rank(&mut records);
    records.truncate(request.limit() as usize);
    Ok(records)
}

/// Sorts records by engagement, highest first, keeping Reddit's order for
/// ties.
pub fn rank(records: &mut [ResultRecord]) {
    records.sort_by(|lhs, rhs| rhs.engagement().cmp(&lhs.engagement()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Searchable;
    use crate::reddit::RedditClient;
    use crate::test_utils::{MockSearch, TestService, listing, raw_post};
    use serde_json::json;

    fn post(id: &str, title: &str, body: &str, score: i64, comments: i64) -> crate::thing::RawPost {
        raw_post(json!({
            "id": id,
            "title": title,
            "selftext": body,
            "subreddit": "test",
            "score": score,
            "num_comments": comments,
            "permalink": format!("/r/test/comments/{id}/"),
            "created_utc": 1735732800.0,
            "author": "tester",
        }))
    }

    #[tokio::test]
    async fn it_returns_at_most_limit_matching_records() {
        let client = MockSearch::new([Ok(vec![
            post("a", "Found a Bug", "", 1, 0),
            post("b", "Unrelated", "nothing to see", 50, 50),
            post("c", "Crash report", "this BUG again", 3, 1),
            post("d", "bugfix release", "", 2, 2),
        ])]);
        let request = SearchRequest::build(["test"])
            .keywords(["bug"])
            .limit(2)
            .build()
            .unwrap();

        let records = search(&client, &request).await.unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            let text = format!("{} {}", record.title(), record.body()).to_lowercase();
            assert!(text.contains("bug"), "{text:?} does not contain \"bug\"");
        }
    }

    #[tokio::test]
    async fn it_fills_the_limit_from_posts_past_the_first_few() {
        // Reddit's search matched the first two on fields other than the
        // title and body.
        let page = listing(
            [
                json!({ "id": "a", "title": "Crash on load", "selftext": "stack trace inside" }),
                json!({ "id": "b", "title": "Weekly thread", "selftext": "" }),
                json!({ "id": "c", "title": "Found a bug", "selftext": "", "score": 3 }),
                json!({ "id": "d", "title": "Another bug", "selftext": "", "score": 1 }),
            ],
            None,
        );
        let client = RedditClient::new(TestService::from_pages([page]));
        let request = SearchRequest::build(["test"])
            .keywords(["bug"])
            .limit(2)
            .build()
            .unwrap();

        let records = search(&client, &request).await.unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Found a bug", "Another bug"]);
    }

    #[tokio::test]
    async fn it_ranks_records_by_engagement() {
        let client = MockSearch::new([Ok(vec![
            post("a", "low", "", 1, 0),
            post("b", "high", "", 10, 10),
            post("c", "middle", "", 5, 1),
        ])]);
        let request = SearchRequest::build(["test"]).build().unwrap();

        let records = search(&client, &request).await.unwrap();

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["high", "middle", "low"]);
    }

    #[tokio::test]
    async fn it_keeps_reddit_order_for_ties() {
        let client = MockSearch::new([Ok(vec![
            post("a", "first", "", 2, 0),
            post("b", "second", "", 1, 1),
        ])]);
        let request = SearchRequest::build(["test"]).build().unwrap();

        let records = search(&client, &request).await.unwrap();

        assert_eq!(records[0].title, "first");
        assert_eq!(records[1].title, "second");
    }

    #[tokio::test]
    async fn it_returns_nothing_when_nothing_matches() {
        let client = MockSearch::new([Ok(vec![post("a", "Wedding dress ideas", "", 1, 0)])]);
        let request = SearchRequest::build(["test"])
            .keywords(["seating chart"])
            .build()
            .unwrap();

        let records = search(&client, &request).await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn it_reports_remote_errors() {
        let client = MockSearch::failing();
        let request = SearchRequest::build(["test"]).build().unwrap();

        let result = search(&client, &request).await;

        assert!(matches!(result, Err(Error::RemoteRequest(_))));
    }
}
