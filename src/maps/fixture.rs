//! In-memory maps backend
//!
//! Serves geocoding, hub and routing answers from fixed data, so the
//! resolver can run without network access. Loadable from a JSON file for
//! the CLI `--fixture` flag.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Geocoder, HubLocator, LookupError, RouteProfile, RouteService};
use crate::geodesic::geodesic_km;
use crate::models::{Hub, HubKind, Place};
use crate::{Result, TripCarbonError};

/// A canned routing answer between two named places, valid both ways
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRoute {
    pub from: String,
    pub to: String,
    pub profile: RouteProfile,
    /// Distance text as the routing service would return it
    pub distance: String,
}

/// Deterministic maps backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticMaps {
    #[serde(default)]
    places: Vec<Place>,
    /// Candidates for nearest-hub searches
    #[serde(default)]
    hubs: Vec<Hub>,
    /// Answers for named-station searches, keyed by `nearby_city`
    #[serde(default)]
    named_stations: Vec<Hub>,
    #[serde(default)]
    routes: Vec<StaticRoute>,
}

impl StaticMaps {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a backend from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| {
            TripCarbonError::validation(format!("invalid fixture {}: {e}", path.display()))
        })
    }

    #[must_use]
    pub fn with_place(mut self, place: Place) -> Self {
        self.places.push(place);
        self
    }

    #[must_use]
    pub fn with_hub(mut self, hub: Hub) -> Self {
        self.hubs.push(hub);
        self
    }

    #[must_use]
    pub fn with_named_station(mut self, hub: Hub) -> Self {
        self.named_stations.push(hub);
        self
    }

    #[must_use]
    pub fn with_route(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        profile: RouteProfile,
        distance: impl Into<String>,
    ) -> Self {
        self.routes.push(StaticRoute {
            from: from.into(),
            to: to.into(),
            profile,
            distance: distance.into(),
        });
        self
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[async_trait]
impl Geocoder for StaticMaps {
    async fn resolve(&self, name: &str) -> std::result::Result<Place, LookupError> {
        self.places
            .iter()
            .find(|p| same_name(&p.name, name))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(name.trim().to_string()))
    }
}

#[async_trait]
impl HubLocator for StaticMaps {
    async fn nearest_hub(
        &self,
        near: &Place,
        kind: HubKind,
        radius_km: f64,
    ) -> std::result::Result<Hub, LookupError> {
        self.hubs
            .iter()
            .filter(|hub| hub.kind == kind)
            .map(|hub| (hub, geodesic_km(near, &hub.place)))
            .filter(|(_, distance)| *distance <= radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(hub, _)| hub.clone())
            .ok_or(LookupError::NoHubWithinRadius { kind, radius_km })
    }

    async fn named_station(&self, city: &str) -> std::result::Result<Hub, LookupError> {
        self.named_stations
            .iter()
            .find(|hub| same_name(&hub.nearby_city, city))
            .cloned()
            .ok_or_else(|| LookupError::NotFound(format!("rail station in {}", city.trim())))
    }
}

#[async_trait]
impl RouteService for StaticMaps {
    async fn route_distance(
        &self,
        from: &Place,
        to: &Place,
        profile: RouteProfile,
    ) -> std::result::Result<String, LookupError> {
        self.routes
            .iter()
            .find(|route| {
                route.profile == profile
                    && ((same_name(&route.from, &from.name) && same_name(&route.to, &to.name))
                        || (same_name(&route.from, &to.name) && same_name(&route.to, &from.name)))
            })
            .map(|route| route.distance.clone())
            .ok_or_else(|| LookupError::NoRoute {
                from: from.name.clone(),
                to: to.name.clone(),
            })
    }
}
