use subscout::query::SearchRequest;
use subscout::reddit::service::{RedditService, Service};
use subscout::reddit::{RedditClient, Search};
use subscout::thing::Listing;

// These tests hit the live Reddit API, so they are ignored by default and
// only check that requests succeed and parse. Run them with
// `cargo test -- --ignored`.

#[tokio::test]
#[ignore = "contacts reddit.com"]
async fn it_retrieves_a_search_page() {
    let service = RedditService::default();
    let request = SearchRequest::build(["rust"])
        .keywords(["async"])
        .limit(5)
        .build()
        .unwrap();
    let page = request.page(Some("async"), None);
    let body = service.get_page(&page).await.unwrap();
    assert!(Listing::parse(&body).is_ok());
}

#[tokio::test]
#[ignore = "contacts reddit.com"]
async fn it_retrieves_the_newest_posts() {
    let client = RedditClient::default();
    let request = SearchRequest::newest(["rust"]).unwrap();
    let posts = client.search(&request).await.unwrap();
    assert!(!posts.is_empty());
    assert!(posts.len() <= 100);
}
