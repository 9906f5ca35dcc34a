//! Google Maps Platform client
//!
//! Geocoding, Places (nearby and text search) and Distance Matrix JSON
//! endpoints. Every request is a plain GET keyed by the configured API key;
//! there are no retries and the HTTP client keeps its default timeouts.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::{Geocoder, HubLocator, LookupError, RouteProfile, RouteService};
use crate::config::MapsConfig;
use crate::geodesic::geodesic_km;
use crate::models::{Hub, HubKind, Place};
use crate::{TripCarbonError, VERSION};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
/// Nearby search answers `INVALID_REQUEST` above this radius
const NEARBY_SEARCH_MAX_RADIUS_M: f64 = 50_000.0;

/// Live maps client
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    geometry: Geometry,
    vicinity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
    error_message: Option<String>,
}

impl GoogleMapsClient {
    /// Create a new client; an API key is required
    pub fn new(config: &MapsConfig) -> crate::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TripCarbonError::config(
                    "maps.api_key is required (set TRIPCARBON_MAPS__API_KEY or add it to config.toml)",
                )
            })?;

        let client = Client::builder()
            .user_agent(format!("TripCarbon/{VERSION}"))
            .build()
            .map_err(|e| TripCarbonError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET `{base}/{endpoint}/json?{query}&key=...` and decode the body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &str,
    ) -> Result<T, LookupError> {
        let url = format!(
            "{}/{endpoint}/json?{query}&key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        debug!("Maps request: {}?{}", endpoint, query);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                endpoint,
                status: status.to_string(),
                message: (!body.is_empty()).then_some(body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Parse(format!("Failed to parse {endpoint} response: {e}")))
    }
}

/// Map a service status to an error, leaving `ZERO_RESULTS` to the caller
fn check_status(
    endpoint: &'static str,
    status: &str,
    error_message: Option<String>,
) -> Result<(), LookupError> {
    if status == STATUS_OK || status == STATUS_ZERO_RESULTS {
        Ok(())
    } else {
        Err(LookupError::Status {
            endpoint,
            status: status.to_string(),
            message: error_message,
        })
    }
}

/// `"Sahar Airport Road, Andheri East, Mumbai"` → `"Mumbai"`
fn city_from_vicinity(vicinity: &str) -> Option<String> {
    vicinity
        .rsplit(',')
        .map(str::trim)
        .find(|part| !part.is_empty())
        .map(ToString::to_string)
}

fn route_params(profile: RouteProfile) -> &'static str {
    match profile {
        RouteProfile::Driving => "mode=driving",
        RouteProfile::Rail => "mode=transit&transit_mode=rail",
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn resolve(&self, name: &str) -> Result<Place, LookupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LookupError::NotFound("empty place name".to_string()));
        }

        let query = format!("address={}", urlencoding::encode(name));
        let response: GeocodeResponse = self.get_json("geocode", &query).await?;
        check_status("geocode", &response.status, response.error_message)?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;

        let country = result
            .address_components
            .into_iter()
            .find(|c| c.types.iter().any(|t| t == "country"))
            .map(|c| c.long_name);

        let location = result.geometry.location;
        debug!(
            "Geocoded {} to ({:.4}, {:.4}) in {:?}",
            name, location.lat, location.lng, country
        );

        Ok(Place {
            name: name.to_string(),
            latitude: location.lat,
            longitude: location.lng,
            country,
        })
    }
}

#[async_trait]
impl HubLocator for GoogleMapsClient {
    #[instrument(skip(self, near), fields(near = %near.name))]
    async fn nearest_hub(
        &self,
        near: &Place,
        kind: HubKind,
        radius_km: f64,
    ) -> Result<Hub, LookupError> {
        let radius_m = (radius_km * 1000.0).round().min(NEARBY_SEARCH_MAX_RADIUS_M);
        let query = format!(
            "location={}&radius={radius_m}&type={}",
            near.query_coordinates(),
            kind.place_type()
        );
        let response: PlacesResponse = self.get_json("place/nearbysearch", &query).await?;
        check_status("place/nearbysearch", &response.status, response.error_message)?;

        // Results are ranked by prominence, not distance
        let hub = response
            .results
            .into_iter()
            .map(|result| {
                let place = Place::new(
                    result.name,
                    result.geometry.location.lat,
                    result.geometry.location.lng,
                );
                let nearby_city = result
                    .vicinity
                    .as_deref()
                    .and_then(city_from_vicinity)
                    .unwrap_or_else(|| near.name.clone());
                let distance = geodesic_km(near, &place);
                (Hub::new(place, kind, nearby_city), distance)
            })
            .filter(|(_, distance)| *distance <= radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(hub, _)| hub)
            .ok_or(LookupError::NoHubWithinRadius { kind, radius_km })?;

        info!("Nearest {} to {}: {}", kind, near.name, hub.name());
        Ok(hub)
    }

    #[instrument(skip(self))]
    async fn named_station(&self, city: &str) -> Result<Hub, LookupError> {
        let query = format!(
            "query={}&type={}",
            urlencoding::encode(&format!("railway station in {}", city.trim())),
            HubKind::RailStation.place_type()
        );
        let response: PlacesResponse = self.get_json("place/textsearch", &query).await?;
        check_status("place/textsearch", &response.status, response.error_message)?;

        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(format!("rail station in {city}")))?;

        let place = Place::new(
            result.name,
            result.geometry.location.lat,
            result.geometry.location.lng,
        );
        info!("Station for {}: {}", city, place.name);
        Ok(Hub::new(place, HubKind::RailStation, city.trim()))
    }
}

#[async_trait]
impl RouteService for GoogleMapsClient {
    #[instrument(skip(self, from, to), fields(from = %from.name, to = %to.name))]
    async fn route_distance(
        &self,
        from: &Place,
        to: &Place,
        profile: RouteProfile,
    ) -> Result<String, LookupError> {
        let query = format!(
            "origins={}&destinations={}&{}",
            from.query_coordinates(),
            to.query_coordinates(),
            route_params(profile)
        );
        let response: DistanceMatrixResponse = self.get_json("distancematrix", &query).await?;
        check_status("distancematrix", &response.status, response.error_message)?;

        let no_route = || LookupError::NoRoute {
            from: from.name.clone(),
            to: to.name.clone(),
        };

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(no_route)?;

        if element.status != STATUS_OK {
            debug!("Distance matrix element status {}", element.status);
            return Err(no_route());
        }

        element.distance.map(|d| d.text).ok_or_else(no_route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        let config = MapsConfig::default();
        let err = GoogleMapsClient::new(&config).unwrap_err();
        assert!(matches!(err, TripCarbonError::Config { .. }));
    }

    #[test]
    fn test_client_creation() {
        let config = MapsConfig {
            api_key: Some("test_key_12345".to_string()),
            base_url: "https://maps.example.com/api/".to_string(),
        };
        let client = GoogleMapsClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://maps.example.com/api");
    }

    #[test]
    fn test_city_from_vicinity() {
        assert_eq!(
            city_from_vicinity("Sahar Airport Road, Andheri East, Mumbai").as_deref(),
            Some("Mumbai")
        );
        assert_eq!(city_from_vicinity("Pune").as_deref(), Some("Pune"));
        assert_eq!(city_from_vicinity(" , ").as_deref(), None);
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("geocode", "OK", None).is_ok());
        assert!(check_status("geocode", "ZERO_RESULTS", None).is_ok());
        assert!(matches!(
            check_status("geocode", "REQUEST_DENIED", Some("bad key".to_string())),
            Err(LookupError::Status { .. })
        ));
    }
}
