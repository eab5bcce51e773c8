//! Feed cache integration tests
//!
//! Pagination, merge and refetch behaviour against a mocked `/posts`.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedchat::client::LoadOutcome;
use feedchat::shared::ClientError;

use crate::common::*;

#[tokio::test]
async fn test_three_pages_accumulate_without_duplicates() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;

    mount_posts_page(&server, 0, posts_page_json(1..=10, 0, 10, 25), 1).await;
    mount_posts_page(&server, 10, posts_page_json(11..=20, 10, 10, 25), 1).await;
    // id 15 shows up again on the last page
    mount_posts_page(&server, 20, posts_page_json([15, 21, 22, 23, 24, 25], 20, 10, 25), 1).await;

    let feed = app.feed_mut();
    assert_eq!(feed.load(0, 10).await.unwrap(), LoadOutcome::Appended(10));
    assert_eq!(feed.items().len(), 10);

    assert_eq!(feed.load(10, 10).await.unwrap(), LoadOutcome::Appended(10));
    assert_eq!(feed.items().len(), 20);

    assert_eq!(feed.load(20, 10).await.unwrap(), LoadOutcome::Appended(5));
    assert_eq!(feed.items().len(), 25);
    assert_eq!(feed.total(), 25);

    assert_unique_ids(feed.items());
    assert_ids(feed.items(), &(1..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_same_skip_is_served_from_cache() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;
    mount_posts_page(&server, 0, posts_page_json(1..=10, 0, 10, 25), 1).await;

    let feed = app.feed_mut();
    feed.load(0, 10).await.unwrap();
    assert_eq!(feed.load(0, 10).await.unwrap(), LoadOutcome::Cached);

    assert_eq!(feed.items().len(), 10);
    assert_unique_ids(feed.items());
}

#[tokio::test]
async fn test_load_more_until_exhausted() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;
    mount_posts_page(&server, 0, posts_page_json(1..=10, 0, 10, 25), 1).await;
    mount_posts_page(&server, 10, posts_page_json(11..=20, 10, 10, 25), 1).await;
    // The server reports the clamped limit on the last page
    mount_posts_page(&server, 20, posts_page_json(21..=25, 20, 5, 25), 1).await;

    let mut outcomes = Vec::new();
    loop {
        let outcome = app.load_more().await.unwrap();
        if outcome == LoadOutcome::NothingToLoad {
            break;
        }
        outcomes.push(outcome);
    }

    assert_eq!(
        outcomes,
        vec![
            LoadOutcome::Appended(10),
            LoadOutcome::Appended(10),
            LoadOutcome::Appended(5)
        ]
    );
    let view = app.feed().view();
    assert_eq!(view.items.len(), 25);
    assert_eq!(view.total, 25);
    assert!(!app.feed().has_more());
}

#[tokio::test]
async fn test_feed_request_without_session_has_no_bearer() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    mount_posts_page(&server, 0, posts_page_json(1..=3, 0, 10, 3), 1).await;

    app.start().await;
    app.load_more().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(app.feed().items().len(), 3);
}

#[tokio::test]
async fn test_server_error_is_terminal_for_that_fetch() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = app.load_more().await.unwrap_err();

    assert_matches!(err, ClientError::Http { status: 500, .. });
    assert_eq!(app.feed().last_error(), Some(&err));
    assert!(app.feed().items().is_empty());
    // A failed fetch does not clear the session
    assert!(app.session().access_token().await.is_some());
}

#[tokio::test]
async fn test_malformed_listing_is_deserialization_error() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"posts\": 12"))
        .mount(&server)
        .await;

    let err = app.load_more().await.unwrap_err();
    assert_matches!(err, ClientError::Deserialization { .. });
}

#[tokio::test]
async fn test_logout_resets_feed() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;
    mount_posts_page(&server, 0, posts_page_json(1..=10, 0, 10, 25), 1).await;

    app.load_more().await.unwrap();
    assert_eq!(app.feed().items().len(), 10);

    app.logout().await;
    assert!(app.feed().items().is_empty());
    assert_eq!(app.feed().total(), 0);
}

#[tokio::test]
async fn test_load_more_terminates_when_overlap_leaves_feed_short() {
    let server = MockServer::start().await;
    let (mut app, _storage) = app_for(&server);
    sign_in(&mut app, &server).await;
    mount_posts_page(&server, 0, posts_page_json(1..=10, 0, 10, 25), 1).await;
    mount_posts_page(&server, 10, posts_page_json(11..=20, 10, 10, 25), 1).await;
    // id 15 repeats, so only 24 unique items ever arrive
    mount_posts_page(&server, 20, posts_page_json([15, 21, 22, 23, 24], 20, 5, 25), 1).await;
    mount_posts_page(&server, 25, posts_page_json([], 25, 0, 25), 1).await;

    let mut loads = 0;
    while app.feed().has_more() || loads == 0 {
        app.load_more().await.unwrap();
        loads += 1;
        assert!(loads <= 3, "pagination did not settle");
    }
    assert_eq!(app.feed().items().len(), 24);

    // An explicit request past the end still settles the feed
    let feed = app.feed_mut();
    assert_eq!(feed.load(25, 10).await.unwrap(), LoadOutcome::Appended(0));
    assert_eq!(feed.next_skip(), 25);
    assert!(!feed.has_more());
    assert_eq!(app.load_more().await.unwrap(), LoadOutcome::NothingToLoad);
    assert_eq!(app.load_more().await.unwrap(), LoadOutcome::NothingToLoad);

    assert_unique_ids(app.feed().items());
    assert_eq!(app.feed().total(), 25);
}
