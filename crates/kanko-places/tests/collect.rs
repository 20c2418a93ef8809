//! Integration tests for place collection using wiremock HTTP mocks and a
//! temp data root.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kanko_places::{
    run_collect_places, CollectParams, NearbySearchClient, PlaceDetailsClient, PlacesError,
};
use kanko_store::DataRoot;

const CENTER: (f64, f64) = (35.9251, 139.4856);

fn nearby_client(base_url: &str) -> NearbySearchClient {
    NearbySearchClient::with_base_url("maps-key", 30, "kanko-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn details_client(base_url: &str) -> PlaceDetailsClient {
    PlaceDetailsClient::with_base_url("maps-key", 30, "kanko-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn candidate(place_id: &str, rating: f64, reviews: u64) -> serde_json::Value {
    serde_json::json!({
        "place_id": place_id,
        "name": format!("place {place_id}"),
        "rating": rating,
        "user_ratings_total": reviews
    })
}

fn params(max_results: usize) -> CollectParams {
    CollectParams {
        center: CENTER,
        search_radius: 4000,
        max_pages: 3,
        max_results,
        ratio_popularity: 0.5,
        min_reviews: 100,
        page_delay_secs: 0,
    }
}

#[tokio::test]
async fn fetch_category_follows_continuation_tokens() {
    let server = MockServer::start().await;

    // Continuation page, matched on its token; mounted first so it takes
    // precedence over the catch-all first page.
    Mock::given(method("GET"))
        .and(query_param("pagetoken", "T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [candidate("P2", 4.0, 50)],
            "status": "OK"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("radius", "4000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [candidate("P1", 4.5, 500)],
            "next_page_token": "T2",
            "status": "OK"
        })))
        .mount(&server)
        .await;

    let client = nearby_client(&server.uri());
    let results = client
        .fetch_category(CENTER, 4000, None, 3, 0)
        .await
        .expect("paged fetch should succeed");

    let ids: Vec<&str> = results.iter().filter_map(|p| p.place_id.as_deref()).collect();
    assert_eq!(ids, vec!["P1", "P2"]);
}

#[tokio::test]
async fn fetch_category_respects_page_budget() {
    let server = MockServer::start().await;
    // Every page advertises a continuation; the budget must stop paging.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [candidate("P1", 4.5, 500)],
            "next_page_token": "AGAIN",
            "status": "OK"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = nearby_client(&server.uri());
    let results = client
        .fetch_category(CENTER, 4000, Some("restaurant"), 2, 0)
        .await
        .expect("paged fetch should succeed");
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn envelope_error_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [],
            "status": "OVER_QUERY_LIMIT"
        })))
        .mount(&server)
        .await;

    let client = nearby_client(&server.uri());
    let result = client.fetch_category(CENTER, 4000, None, 3, 0).await;
    assert!(
        matches!(result, Err(PlacesError::Api { ref status, .. }) if status == "OVER_QUERY_LIMIT"),
        "expected Api(OVER_QUERY_LIMIT), got: {result:?}"
    );
}

#[tokio::test]
async fn collect_selects_tiers_and_persists_details() {
    let nearby_server = MockServer::start().await;
    // All three category filters answer with the same stubs; the collector
    // dedups across categories before selection.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                candidate("P1", 4.5, 500),
                candidate("P2", 4.8, 50),
                candidate("P3", 4.0, 300)
            ],
            "status": "OK"
        })))
        .expect(3)
        .mount(&nearby_server)
        .await;

    let details_server = MockServer::start().await;
    for place_id in ["P1", "P3"] {
        Mock::given(method("GET"))
            .and(path(format!("/{place_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": place_id,
                "displayName": {"text": format!("place {place_id}"), "languageCode": "ja"},
                "rating": 4.5,
                "reviews": []
            })))
            .expect(1)
            .mount(&details_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let count = run_collect_places(
        &nearby_client(&nearby_server.uri()),
        &details_client(&details_server.uri()),
        &root,
        &params(2),
    )
    .await
    .expect("collection should succeed");

    // min_reviews=100 drops P2; popularity tier [P1], quality tier [P3].
    assert_eq!(count, 2);
    let saved = root.load_place_details().unwrap();
    let ids: Vec<&str> = saved.iter().filter_map(|d| d["id"].as_str()).collect();
    assert_eq!(ids, vec!["P1", "P3"]);
}

#[tokio::test]
async fn detail_fetch_failure_aborts_without_partial_persistence() {
    let nearby_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [candidate("P1", 4.5, 500), candidate("P3", 4.0, 300)],
            "status": "OK"
        })))
        .mount(&nearby_server)
        .await;

    let details_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "P1"})))
        .mount(&details_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/P3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&details_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let result = run_collect_places(
        &nearby_client(&nearby_server.uri()),
        &details_client(&details_server.uri()),
        &root,
        &params(4),
    )
    .await;

    assert!(matches!(result, Err(PlacesError::Api { .. })));
    assert!(
        root.load_place_details().is_err(),
        "no partial persistence on abort"
    );
}
