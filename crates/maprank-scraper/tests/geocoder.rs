//! Integration tests for `Geocoder::geocode_address`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made. The geocoder is tolerant by contract:
//! every failure mode must come back as `None`, never a panic or error.

use maprank_core::{AppConfig, GeoLocation};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use maprank_scraper::Geocoder;

/// Builds a test configuration pointed at the mock server.
fn test_config(endpoint: &str) -> AppConfig {
    AppConfig {
        headless: true,
        browser_recycle_threshold: 10,
        navigation_timeout_secs: 30,
        selector_timeout_secs: 5,
        scroll_settle_ms: 1500,
        max_scroll_passes: 5,
        viewport_width: 1280,
        viewport_height: 900,
        locale: "ja-JP".to_string(),
        user_agent: "maprank-test/0.1".to_string(),
        inter_keyword_delay_ms: 2000,
        geocoder_endpoint: endpoint.to_string(),
        geocoder_timeout_secs: 5,
        default_location: GeoLocation::default(),
    }
}

#[tokio::test]
async fn resolves_coordinates_from_the_first_hit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "東京都渋谷区1-2-3"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!([
            {"lat": "35.6595", "lon": "139.7005", "display_name": "Shibuya"}
        ])))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(&test_config(&server.uri())).expect("failed to build Geocoder");
    let location = geocoder.geocode_address("東京都渋谷区1-2-3").await;

    let location = location.expect("expected a geocoded location");
    assert!((location.latitude - 35.6595).abs() < 1e-9);
    assert!((location.longitude - 139.7005).abs() < 1e-9);
}

#[tokio::test]
async fn no_hits_yields_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!([])))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(&test_config(&server.uri())).expect("failed to build Geocoder");
    assert!(geocoder.geocode_address("nowhere at all").await.is_none());
}

#[tokio::test]
async fn server_error_yields_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(&test_config(&server.uri())).expect("failed to build Geocoder");
    assert!(geocoder.geocode_address("東京都渋谷区1-2-3").await.is_none());
}

#[tokio::test]
async fn malformed_body_yields_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(&test_config(&server.uri())).expect("failed to build Geocoder");
    assert!(geocoder.geocode_address("東京都渋谷区1-2-3").await.is_none());
}

#[tokio::test]
async fn unparseable_coordinates_yield_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!([
            {"lat": "not-a-number", "lon": "139.7005"}
        ])))
        .mount(&server)
        .await;

    let geocoder = Geocoder::new(&test_config(&server.uri())).expect("failed to build Geocoder");
    assert!(geocoder.geocode_address("東京都渋谷区1-2-3").await.is_none());
}
