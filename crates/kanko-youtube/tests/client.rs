//! Integration tests for `YouTubeClient` and the windowed collector, using
//! wiremock HTTP mocks.

use chrono::{TimeZone, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kanko_youtube::{collect_windowed_search, YouTubeClient, YouTubeError};

fn test_client(base_url: &str) -> YouTubeClient {
    YouTubeClient::with_base_url("test-key", 30, "kanko-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn search_item(video_id: &str, published_at: &str) -> serde_json::Value {
    serde_json::json!({
        "id": {"kind": "youtube#video", "videoId": video_id},
        "snippet": {
            "publishedAt": published_at,
            "title": format!("title {video_id}"),
            "description": "小江戸川越散策"
        }
    })
}

fn empty_search_page() -> serde_json::Value {
    serde_json::json!({"items": []})
}

#[tokio::test]
async fn search_page_parses_items_and_token() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "items": [search_item("abc123", "2023-01-15T09:00:00Z")],
        "nextPageToken": "TOKEN2"
    });
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "川越"))
        .and(query_param("maxResults", "50"))
        .and(query_param("type", "video"))
        .and(query_param("order", "date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .search_page("川越", None, None, None)
        .await
        .expect("should parse search page");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id.video_id.as_deref(), Some("abc123"));
    assert_eq!(page.next_page_token.as_deref(), Some("TOKEN2"));
}

#[tokio::test]
async fn search_page_surfaces_api_error_message() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "error": {"code": 403, "message": "quotaExceeded"}
    });
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.search_page("川越", None, None, None).await;
    match result {
        Err(YouTubeError::Api { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "quotaExceeded");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn empty_windows_each_consume_exactly_one_request() {
    let server = MockServer::start().await;
    // Lookback of 2.5 years => 3 one-year windows, each answered empty.
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_search_page()))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let now = Utc.with_ymd_and_hms(2023, 6, 15, 0, 0, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2020, 12, 15, 0, 0, 0).unwrap();
    let collected = collect_windowed_search(&client, "川越", 10, Some(after), now)
        .await
        .expect("collection should succeed");

    assert!(collected.is_empty());
    // .expect(3) on the mock verifies the request count on drop.
}

#[tokio::test]
async fn budget_exhaustion_stops_before_older_windows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_search_page()))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let now = Utc.with_ymd_and_hms(2023, 6, 15, 0, 0, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2018, 6, 15, 0, 0, 0).unwrap();
    collect_windowed_search(&client, "川越", 2, Some(after), now)
        .await
        .expect("collection should succeed");
}

#[tokio::test]
async fn paged_window_merges_duplicates_by_video_id() {
    let server = MockServer::start().await;

    // Second page: matched by its continuation token. Mounted first so the
    // token matcher takes precedence over the catch-all first page.
    let page2 = serde_json::json!({
        "items": [
            search_item("A", "2023-02-01T00:00:00Z"),
            search_item("B", "2023-01-01T00:00:00Z")
        ]
    });
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
        .mount(&server)
        .await;

    let page1 = serde_json::json!({
        "items": [search_item("A", "2023-02-01T00:00:00Z")],
        "nextPageToken": "T2"
    });
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let now = Utc.with_ymd_and_hms(2023, 6, 15, 0, 0, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2022, 6, 15, 0, 0, 0).unwrap();
    let mut collected = collect_windowed_search(&client, "川越", 10, Some(after), now)
        .await
        .expect("collection should succeed");

    collected.sort_by(|a, b| a.video_id.cmp(&b.video_id));
    let ids: Vec<&str> = collected.iter().map(|i| i.video_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[tokio::test]
async fn video_details_batches_ids_in_groups_of_fifty() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "items": [{
            "id": "v0",
            "snippet": {"title": "t", "description": "d", "publishedAt": "2023-01-01T00:00:00Z"},
            "contentDetails": {"duration": "PT5M", "definition": "hd"},
            "statistics": {"viewCount": "123"}
        }]
    });
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ids: Vec<String> = (0..60).map(|i| format!("v{i}")).collect();
    let items = client
        .video_details(&ids)
        .await
        .expect("details fetch should succeed");

    // One mocked item per batch call.
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].statistics.view_count.as_deref(), Some("123"));
}
