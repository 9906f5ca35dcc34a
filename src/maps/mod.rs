//! Maps service adapter
//!
//! Geocoding, transport hub search and routing distances behind three small
//! traits, with a live Google Maps Platform client and an in-memory backend.

pub mod fixture;
pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Hub, HubKind, Place};

pub use fixture::StaticMaps;
pub use google::GoogleMapsClient;

/// Errors that can occur during maps lookups
#[derive(Debug, Error)]
pub enum LookupError {
    /// Place name could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// No hub of the requested kind inside the search radius
    #[error("No {kind} within {radius_km} km")]
    NoHubWithinRadius { kind: HubKind, radius_km: f64 },

    /// Routing service has no route between the two places
    #[error("No route from {from} to {to}")]
    NoRoute { from: String, to: String },

    /// Service answered with a non-OK status
    #[error("{endpoint} returned {status}{}", detail(.message))]
    Status {
        endpoint: &'static str,
        status: String,
        message: Option<String>,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a service response
    #[error("Parse error: {0}")]
    Parse(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Travel profile for routing-service distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteProfile {
    Driving,
    Rail,
}

/// Resolves free-text place names
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a city name to coordinates and country
    async fn resolve(&self, name: &str) -> Result<Place, LookupError>;
}

/// Finds airports and rail stations
#[async_trait]
pub trait HubLocator: Send + Sync {
    /// Closest hub of `kind` to `near`, at most `radius_km` away
    async fn nearest_hub(
        &self,
        near: &Place,
        kind: HubKind,
        radius_km: f64,
    ) -> Result<Hub, LookupError>;

    /// Rail station found by searching for stations in a named city
    async fn named_station(&self, city: &str) -> Result<Hub, LookupError>;
}

/// Routing-service distances, returned as the service's free text
#[async_trait]
pub trait RouteService: Send + Sync {
    async fn route_distance(
        &self,
        from: &Place,
        to: &Place,
        profile: RouteProfile,
    ) -> Result<String, LookupError>;
}

/// Everything the resolver needs from a maps backend
pub trait MapsProvider: Geocoder + HubLocator + RouteService {}

impl<T: Geocoder + HubLocator + RouteService> MapsProvider for T {}
