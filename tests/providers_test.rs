use bytes::Bytes;
use futures_util::TryStreamExt;
use httpmock::prelude::*;
use mealstretch::app::wire::{CoordinateQuery, PlanMealBody};
use mealstretch::{AppConfig, MealStretchService, RegionTag};
use serde_json::json;
use std::time::Duration;

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.google.api_key = Some("maps-key".to_string());
    config.google.base_url = server.base_url();
    config.elevenlabs.api_key = Some("tts-key".to_string());
    config.elevenlabs.base_url = server.base_url();
    config.elevenlabs.voice_id = "narrator-voice".to_string();
    config.http.timeout_seconds = 1;
    config
}

#[tokio::test]
async fn test_region_from_reverse_geocode_biases_ranking() {
    let server = MockServer::start();
    let reverse = server.mock(|when, then| {
        when.method(GET)
            .path("/geocode/json")
            .query_param("latlng", "29.76,-95.37")
            .query_param("key", "maps-key");
        then.status(200).json_body(json!({
            "status": "OK",
            "results": [{
                "address_components": [
                    {"short_name": "TX", "types": ["administrative_area_level_1", "political"]},
                    {"short_name": "US", "types": ["country", "political"]}
                ],
                "geometry": {"location": {"lat": 29.76, "lng": -95.37}}
            }]
        }));
    });

    let service = MealStretchService::from_config(&config_for(&server)).unwrap();
    let body: PlanMealBody = serde_json::from_value(json!({
        "budget": 15, "people": 4, "hasStove": true, "lat": 29.76, "lng": -95.37
    }))
    .unwrap();
    let response = service.plan_meal(body).await.unwrap();

    reverse.assert();
    assert_eq!(response.region, Some(RegionTag::Southwest));
    let meals = response.meals.unwrap();
    assert_eq!(meals[0].meal_name, "Bean & Cheese Burritos");
    // 美國地區只影響排序，其他料理仍在結果中
    assert!(meals.iter().any(|m| m.region.is_none()));
}

#[tokio::test]
async fn test_region_failure_never_blocks_planning() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/geocode/json");
        then.status(200)
            .json_body(json!({"status": "REQUEST_DENIED", "results": []}));
    });

    let service = MealStretchService::from_config(&config_for(&server)).unwrap();
    let body: PlanMealBody =
        serde_json::from_value(json!({"budget": 15, "people": 4, "lat": 1.0, "lng": 1.0})).unwrap();
    let response = service.plan_meal(body).await.unwrap();

    assert!(response.region.is_none());
    assert!(!response.meals.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_search_timeout_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/place/nearbysearch/json");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"status": "ZERO_RESULTS", "results": []}));
    });

    let service = MealStretchService::from_config(&config_for(&server)).unwrap();
    let query = CoordinateQuery {
        lat: Some("40.0".into()),
        lng: Some("-75.0".into()),
        address: None,
    };
    let stores = service.nearby_stores(&query).await.unwrap();

    assert_eq!(stores.len(), 3);
    assert!(stores.iter().all(|s| s.id.starts_with("fallback-")));
}

#[tokio::test]
async fn test_stores_by_address_geocodes_first() {
    let server = MockServer::start();
    let geocode = server.mock(|when, then| {
        when.method(GET)
            .path("/geocode/json")
            .query_param("address", "Springfield");
        then.status(200).json_body(json!({
            "status": "OK",
            "results": [{
                "address_components": [],
                "geometry": {"location": {"lat": 40.0, "lng": -75.0}}
            }]
        }));
    });
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/place/nearbysearch/json")
            .query_param("location", "40,-75");
        then.status(200)
            .json_body(json!({"status": "ZERO_RESULTS", "results": []}));
    });

    let service = MealStretchService::from_config(&config_for(&server)).unwrap();
    let query = CoordinateQuery {
        address: Some("Springfield".into()),
        ..Default::default()
    };
    let stores = service.nearby_stores(&query).await.unwrap();

    geocode.assert();
    search.assert();
    assert!(stores.is_empty());
}

#[tokio::test]
async fn test_narration_uses_configured_voice() {
    let server = MockServer::start();
    let tts = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/text-to-speech/narrator-voice")
            .header("xi-api-key", "tts-key");
        then.status(200).body("mp3-bytes");
    });

    let service = MealStretchService::from_config(&config_for(&server)).unwrap();
    let chunks: Vec<Bytes> = service
        .narrate(&json!({"text": "A storm is coming."}))
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    tts.assert();
    assert_eq!(chunks.concat(), b"mp3-bytes".to_vec());
}
