use crate::adapters::fallback::fallback_stores;
use crate::adapters::provider_error;
use crate::core::geo::{format_distance, haversine_miles};
use crate::core::region::region_for;
use crate::domain::model::{Coordinates, Store};
use crate::domain::ports::{RegionLookup, RegionResolver, StoreLocator};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::task::JoinSet;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";
pub const API_KEY_SETTING: &str = "GOOGLE_MAPS_API_KEY";
pub const MAX_STORES: usize = 10;
pub const ENRICHED_STORES: usize = 5;
pub const SEARCH_RADIUS_METERS: u32 = 8000;

const PROVIDER: &str = "Google Maps";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    formatted_address: Option<String>,
}

impl GeocodeResult {
    fn component(&self, kind: &str) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.short_name.as_str())
    }
}

/// Google Geocoding / Places 客戶端；同時實作地區解析與店家查詢
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::unconfigured("Maps lookup", API_KEY_SETTING))?;
        fetch_json(&self.client, &self.base_url, path, query, api_key).await
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<(String, Option<String>)>> {
        let response: GeocodeResponse = self
            .get_json(
                "geocode/json",
                &[("latlng", format!("{},{}", coordinates.lat, coordinates.lng))],
            )
            .await?;

        if response.status != "OK" {
            tracing::debug!("Reverse geocode returned status {}", response.status);
            return Ok(None);
        }

        Ok(response.results.iter().find_map(|result| {
            result.component("country").map(|country| {
                (
                    country.to_string(),
                    result
                        .component("administrative_area_level_1")
                        .map(str::to_string),
                )
            })
        }))
    }

    async fn search_nearby(&self, coordinates: Coordinates) -> Result<Vec<(Store, f64)>> {
        let response: PlacesResponse = self
            .get_json(
                "place/nearbysearch/json",
                &[
                    ("location", format!("{},{}", coordinates.lat, coordinates.lng)),
                    ("radius", SEARCH_RADIUS_METERS.to_string()),
                    ("type", "grocery_or_supermarket".to_string()),
                ],
            )
            .await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            status => {
                return Err(AppError::upstream(
                    PROVIDER,
                    response
                        .error_message
                        .unwrap_or_else(|| format!("places status {}", status)),
                ))
            }
        }

        let mut stores: Vec<(Store, f64)> = response
            .results
            .into_iter()
            .map(|place| {
                let miles = haversine_miles(
                    coordinates,
                    Coordinates::new(place.geometry.location.lat, place.geometry.location.lng),
                );
                let store = Store {
                    id: place.place_id,
                    name: place.name,
                    address: place.vicinity.unwrap_or_default(),
                    distance: format_distance(miles),
                };
                (store, miles)
            })
            .collect();

        stores.sort_by(|a, b| a.1.total_cmp(&b.1));
        stores.truncate(MAX_STORES);
        Ok(stores)
    }

    /// 以 place details 補上最近幾家店的完整地址；失敗時保留原地址
    async fn enrich_addresses(&self, stores: &mut [Store]) {
        let Some(api_key) = self.api_key.clone() else {
            return;
        };

        let mut tasks = JoinSet::new();
        for (index, store) in stores.iter().enumerate().take(ENRICHED_STORES) {
            let client = self.client.clone();
            let base_url = self.base_url.clone();
            let api_key = api_key.clone();
            let place_id = store.id.clone();
            tasks.spawn(async move {
                let details: Result<DetailsResponse> = fetch_json(
                    &client,
                    &base_url,
                    "place/details/json",
                    &[
                        ("place_id", place_id),
                        ("fields", "formatted_address".to_string()),
                    ],
                    &api_key,
                )
                .await;
                (index, details)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(details))) => {
                    let address = details
                        .result
                        .and_then(|r| r.formatted_address)
                        .filter(|a| !a.is_empty());
                    match address {
                        Some(address) if details.status == "OK" => stores[index].address = address,
                        _ => tracing::debug!(
                            "No detailed address for {} (status {})",
                            stores[index].name,
                            details.status
                        ),
                    }
                }
                Ok((index, Err(e))) => {
                    tracing::warn!("Address lookup failed for {}: {}", stores[index].name, e);
                }
                Err(e) => tracing::warn!("Address lookup task failed: {}", e),
            }
        }
    }
}

async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    path: &str,
    query: &[(&str, String)],
    api_key: &str,
) -> Result<T> {
    let url = format!("{}/{}", base_url, path);
    tracing::debug!("Making Maps request to: {}", url);

    let response = client
        .get(&url)
        .query(query)
        .query(&[("key", api_key)])
        .send()
        .await
        .map_err(|e| provider_error(PROVIDER, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::upstream_status(PROVIDER, status.as_u16()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| provider_error(PROVIDER, e))
}

#[async_trait]
impl RegionResolver for GoogleMapsClient {
    async fn resolve(&self, coordinates: Coordinates) -> RegionLookup {
        if !self.is_configured() {
            tracing::debug!("Region lookup skipped: {} not set", API_KEY_SETTING);
            return RegionLookup::Unavailable;
        }

        match self.reverse_geocode(coordinates).await {
            Ok(Some((country, state))) => {
                match region_for(Some(country.as_str()), state.as_deref()) {
                    Some(tag) => {
                        tracing::debug!("Resolved region {} ({} {:?})", tag, country, state);
                        RegionLookup::Resolved(tag)
                    }
                    None => RegionLookup::Unavailable,
                }
            }
            Ok(None) => RegionLookup::Unavailable,
            Err(e) => {
                tracing::warn!("Region lookup failed, continuing without region: {}", e);
                RegionLookup::Unavailable
            }
        }
    }
}

#[async_trait]
impl StoreLocator for GoogleMapsClient {
    async fn nearby_stores(&self, coordinates: Coordinates) -> Result<Vec<Store>> {
        if !self.is_configured() {
            tracing::info!("{} not set, returning fallback stores", API_KEY_SETTING);
            return Ok(fallback_stores());
        }

        let mut stores: Vec<Store> = match self.search_nearby(coordinates).await {
            Ok(found) => found.into_iter().map(|(store, _)| store).collect(),
            Err(AppError::ProviderUnavailable { .. }) => {
                tracing::warn!("Places search timed out, returning fallback stores");
                return Ok(fallback_stores());
            }
            Err(e) => return Err(e),
        };

        self.enrich_addresses(&mut stores).await;
        tracing::info!("Found {} nearby stores", stores.len());
        Ok(stores)
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        if !self.is_configured() {
            return Err(AppError::unconfigured("Geocoding", API_KEY_SETTING));
        }

        let response: GeocodeResponse = self
            .get_json("geocode/json", &[("address", address.to_string())])
            .await?;

        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                return Err(AppError::NotFound {
                    message: "Address not found".to_string(),
                })
            }
            status => {
                return Err(AppError::upstream(
                    PROVIDER,
                    response
                        .error_message
                        .unwrap_or_else(|| format!("geocode status {}", status)),
                ))
            }
        }

        response
            .results
            .into_iter()
            .find_map(|r| r.geometry)
            .map(|g| Coordinates::new(g.location.lat, g.location.lng))
            .ok_or_else(|| AppError::NotFound {
                message: "Address not found".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RegionTag;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> GoogleMapsClient {
        GoogleMapsClient::new(Client::new(), Some("test-key".to_string()), server.base_url())
    }

    #[tokio::test]
    async fn test_unconfigured_returns_fallback_stores() {
        let maps = GoogleMapsClient::new(Client::new(), None, DEFAULT_BASE_URL);
        let stores = maps
            .nearby_stores(Coordinates::new(40.0, -75.0))
            .await
            .unwrap();
        assert_eq!(stores, fallback_stores());
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_unconfigured() {
        let maps = GoogleMapsClient::new(Client::new(), Some("  ".to_string()), DEFAULT_BASE_URL);
        assert!(!maps.is_configured());
        let err = maps.geocode("1 Main St").await.unwrap_err();
        assert_eq!(err.status_code(), 503);
    }

    #[tokio::test]
    async fn test_reverse_geocode_us_state() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/geocode/json")
                .query_param("latlng", "33.45,-112.07")
                .query_param("key", "test-key");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [{
                    "address_components": [
                        {"short_name": "Phoenix", "types": ["locality", "political"]},
                        {"short_name": "AZ", "types": ["administrative_area_level_1", "political"]},
                        {"short_name": "US", "types": ["country", "political"]}
                    ],
                    "geometry": {"location": {"lat": 33.45, "lng": -112.07}}
                }]
            }));
        });

        let lookup = client_for(&server)
            .resolve(Coordinates::new(33.45, -112.07))
            .await;

        mock.assert();
        assert_eq!(lookup, RegionLookup::Resolved(RegionTag::Southwest));
    }

    #[tokio::test]
    async fn test_reverse_geocode_country_special_case() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [{
                    "address_components": [
                        {"short_name": "Tokyo", "types": ["administrative_area_level_1"]},
                        {"short_name": "JP", "types": ["country"]}
                    ]
                }]
            }));
        });

        let lookup = client_for(&server)
            .resolve(Coordinates::new(35.68, 139.69))
            .await;
        assert_eq!(lookup, RegionLookup::Resolved(RegionTag::Japanese));
    }

    #[tokio::test]
    async fn test_region_failure_is_swallowed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(500);
        });

        let lookup = client_for(&server)
            .resolve(Coordinates::new(35.68, 139.69))
            .await;
        assert_eq!(lookup, RegionLookup::Unavailable);
    }

    #[tokio::test]
    async fn test_geocode_address() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/geocode/json")
                .query_param("address", "123 Main St, Springfield");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [{"geometry": {"location": {"lat": 39.78, "lng": -89.65}}}]
            }));
        });

        let coords = client_for(&server)
            .geocode("123 Main St, Springfield")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(coords, Coordinates::new(39.78, -89.65));
    }

    #[tokio::test]
    async fn test_geocode_zero_results_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(200)
                .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
        });

        let err = client_for(&server).geocode("nowhere").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_geocode_denied_is_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/geocode/json");
            then.status(200).json_body(serde_json::json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid."
            }));
        });

        let err = client_for(&server).geocode("1 Main St").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_nearby_stores_sorted_and_enriched() {
        let server = MockServer::start();
        let search = server.mock(|when, then| {
            when.method(GET)
                .path("/place/nearbysearch/json")
                .query_param("type", "grocery_or_supermarket");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "results": [
                    {"place_id": "far", "name": "Far Mart", "vicinity": "9 Far Rd",
                     "geometry": {"location": {"lat": 40.10, "lng": -75.0}}},
                    {"place_id": "near", "name": "Near Grocer", "vicinity": "1 Near St",
                     "geometry": {"location": {"lat": 40.01, "lng": -75.0}}}
                ]
            }));
        });
        let near_details = server.mock(|when, then| {
            when.method(GET)
                .path("/place/details/json")
                .query_param("place_id", "near");
            then.status(200).json_body(serde_json::json!({
                "status": "OK",
                "result": {"formatted_address": "1 Near St, Town, PA 19000, USA"}
            }));
        });
        let far_details = server.mock(|when, then| {
            when.method(GET)
                .path("/place/details/json")
                .query_param("place_id", "far");
            then.status(500);
        });

        let stores = client_for(&server)
            .nearby_stores(Coordinates::new(40.0, -75.0))
            .await
            .unwrap();

        search.assert();
        near_details.assert();
        far_details.assert();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].name, "Near Grocer");
        assert_eq!(stores[0].distance, "0.7 mi");
        assert_eq!(stores[0].address, "1 Near St, Town, PA 19000, USA");
        // 補地址失敗時保留 vicinity
        assert_eq!(stores[1].address, "9 Far Rd");
        assert_eq!(stores[1].distance, "6.9 mi");
    }

    #[tokio::test]
    async fn test_nearby_stores_capped_at_ten() {
        let server = MockServer::start();
        let places: Vec<serde_json::Value> = (0..15)
            .map(|i| {
                serde_json::json!({
                    "place_id": format!("p{}", i),
                    "name": format!("Store {}", i),
                    "vicinity": format!("{} Main St", i),
                    "geometry": {"location": {"lat": 40.0 + i as f64 * 0.01, "lng": -75.0}}
                })
            })
            .collect();
        server.mock(|when, then| {
            when.method(GET).path("/place/nearbysearch/json");
            then.status(200)
                .json_body(serde_json::json!({"status": "OK", "results": places}));
        });
        let details = server.mock(|when, then| {
            when.method(GET).path("/place/details/json");
            then.status(200)
                .json_body(serde_json::json!({"status": "NOT_FOUND"}));
        });

        let stores = client_for(&server)
            .nearby_stores(Coordinates::new(40.0, -75.0))
            .await
            .unwrap();

        assert_eq!(stores.len(), MAX_STORES);
        details.assert_hits(ENRICHED_STORES);
        assert_eq!(stores[0].address, "0 Main St");
    }

    #[tokio::test]
    async fn test_nearby_stores_provider_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/place/nearbysearch/json");
            then.status(200).json_body(serde_json::json!({
                "status": "OVER_QUERY_LIMIT",
                "error_message": "quota exceeded"
            }));
        });

        let err = client_for(&server)
            .nearby_stores(Coordinates::new(40.0, -75.0))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_nearby_stores_zero_results() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/place/nearbysearch/json");
            then.status(200)
                .json_body(serde_json::json!({"status": "ZERO_RESULTS", "results": []}));
        });

        let stores = client_for(&server)
            .nearby_stores(Coordinates::new(40.0, -75.0))
            .await
            .unwrap();
        assert!(stores.is_empty());
    }
}
