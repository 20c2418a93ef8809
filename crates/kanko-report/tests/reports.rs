//! Integration tests for the two report paths against a mocked generation
//! endpoint and a temp data root.

use chrono::{TimeZone, Utc};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kanko_genai::GenAiClient;
use kanko_report::{run_place_report, run_video_report, PlaceReportParams, VideoReportParams};
use kanko_store::{CaptionedVideoRecord, DataRoot, EnrichedVideoRecord, PlaceRow, ReviewRow};

fn test_client(base_url: &str) -> GenAiClient {
    GenAiClient::with_base_url("genai-key", 30, "kanko-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn generation(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    })
}

fn captioned(video_id: &str, title: &str, views: u64) -> CaptionedVideoRecord {
    CaptionedVideoRecord {
        video: EnrichedVideoRecord {
            video_id: video_id.to_owned(),
            title: title.to_owned(),
            description: String::new(),
            publish_date: Some(Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap()),
            channel_id: None,
            channel_title: None,
            tags: Vec::new(),
            view_count: views,
            like_count: 42,
            comment_count: 0,
            favorite_count: 0,
            duration_secs: Some(600.0),
            definition: Some("hd".to_owned()),
            category: "Travel & Events".to_owned(),
            default_language: None,
            default_audio_language: None,
            keyword_flags: std::collections::BTreeMap::new(),
        },
        caption: "川越の蔵造りの街並みを歩きます [Music] とても綺麗".to_owned(),
    }
}

fn place_row(place_id: &str, count: u64) -> PlaceRow {
    PlaceRow {
        place_id: place_id.to_owned(),
        name: Some(format!("place {place_id}")),
        display_name_lang: Some("ja".to_owned()),
        address: None,
        lat: None,
        lng: None,
        rating: Some(4.3),
        rating_count: Some(count),
        summary: Some("観光名所".to_owned()),
        editorial_lang: Some("ja".to_owned()),
        types: vec!["tourist_attraction".to_owned()],
        price_level: None,
        tourist_attraction: true,
        food: false,
    }
}

fn review_row(place_id: &str) -> ReviewRow {
    ReviewRow {
        place_id: place_id.to_owned(),
        place_name: None,
        review_author: Some("author".to_owned()),
        review_rating: Some(5.0),
        review_text: Some("最高の 眺め".to_owned()),
        review_time: Some(Utc.with_ymd_and_hms(2023, 7, 15, 0, 0, 0).unwrap()),
        review_language: Some("ja".to_owned()),
    }
}

#[tokio::test]
async fn video_report_summarizes_each_caption_then_aggregates() {
    let server = MockServer::start().await;

    // One fast-model call per video...
    Mock::given(method("POST"))
        .and(path("/flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation("要約")))
        .expect(2)
        .mount(&server)
        .await;
    // ...then exactly one pro-model aggregate call.
    Mock::given(method("POST"))
        .and(path("/pro:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": {"maxOutputTokens": 4600}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation("最終レポート")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    root.save_captions(&[
        captioned("v1", "蔵造り散歩 #kawagoe #travel", 90_000),
        captioned("v2", "川越グルメ", 50_000),
    ])
    .unwrap();

    let params = VideoReportParams {
        max_videos: 20,
        max_chars: 100_000,
        fast_model: "flash".to_owned(),
        pro_model: "pro".to_owned(),
    };
    let out = run_video_report(&test_client(&server.uri()), &root, &params)
        .await
        .expect("report generation should succeed");

    assert_eq!(std::fs::read_to_string(out).unwrap(), "最終レポート");
}

#[tokio::test]
async fn video_report_respects_the_prompt_character_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation("長めの要約テキスト")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation("レポート")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    root.save_captions(&[
        captioned("v1", "一本目", 90_000),
        captioned("v2", "二本目", 50_000),
        captioned("v3", "三本目", 10_000),
    ])
    .unwrap();

    // A tiny character budget admits only the first block.
    let params = VideoReportParams {
        max_videos: 20,
        max_chars: 80,
        fast_model: "flash".to_owned(),
        pro_model: "pro".to_owned(),
    };
    run_video_report(&test_client(&server.uri()), &root, &params)
        .await
        .expect("report generation should succeed");
}

#[tokio::test]
async fn place_report_persists_raw_and_wrapped_renderings() {
    let server = MockServer::start().await;
    let long_line = "これは百文字を超える長い一文になるように繰り返し書かれたテスト用の文章です。".repeat(4);
    let report = format!("{long_line}\n\n第二段落。");
    Mock::given(method("POST"))
        .and(path("/pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation(&report)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    root.save_places(&[place_row("p1", 1200), place_row("p2", 300)])
        .unwrap();
    root.save_reviews(&[review_row("p1"), review_row("p2")]).unwrap();

    let params = PlaceReportParams {
        max_places: 20,
        pro_model: "pro".to_owned(),
        wrap_width: 100,
    };
    let (text_path, wrapped_path) = run_place_report(&test_client(&server.uri()), &root, &params)
        .await
        .expect("report generation should succeed");

    assert_eq!(std::fs::read_to_string(text_path).unwrap(), report);

    let wrapped = std::fs::read_to_string(wrapped_path).unwrap();
    assert!(wrapped.lines().all(|l| l.chars().count() <= 100));
    // The blank paragraph separator survives wrapping.
    assert!(wrapped.contains("\n\n第二段落。"));
}
