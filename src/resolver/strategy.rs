//! Ordered fallback strategies
//!
//! Each distance or hub question is answered by trying a fixed list of
//! strategies in order; the first success wins.

use crate::geodesic::{DistanceParseError, geodesic_km, parse_distance_km};
use crate::maps::{LookupError, MapsProvider, RouteProfile};
use crate::models::{DistanceSource, Hub, HubKind, Place};
use crate::offline::OfflineRouteTable;

/// Driving distance only; no straight-line substitute for road trips
pub const ROAD_DISTANCE: &[GroundStrategy] =
    &[GroundStrategy::RoutingService(RouteProfile::Driving)];

pub const RAIL_DISTANCE: &[GroundStrategy] = &[
    GroundStrategy::RoutingService(RouteProfile::Rail),
    GroundStrategy::Geodesic,
];

/// Drive between a city and its airport
pub const AIRPORT_ACCESS_DISTANCE: &[GroundStrategy] = &[
    GroundStrategy::RoutingService(RouteProfile::Driving),
    GroundStrategy::Geodesic,
];

pub const STATION_LOOKUP: &[StationStrategy] =
    &[StationStrategy::NamedStation, StationStrategy::NearestStation];

pub const AIR_DISTANCE: &[AirStrategy] = &[
    AirStrategy::OfflineByHubCity,
    AirStrategy::OfflineByTripCity,
    AirStrategy::HubGeodesic,
];

/// Why a single strategy produced no answer
#[derive(Debug)]
pub enum StrategyFailure {
    Lookup(LookupError),
    Unparseable {
        text: String,
        error: DistanceParseError,
    },
    NoMatch,
}

impl std::fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyFailure::Lookup(e) => write!(f, "{e}"),
            StrategyFailure::Unparseable { error, .. } => write!(f, "{error}"),
            StrategyFailure::NoMatch => write!(f, "no matching entry"),
        }
    }
}

/// Ways to measure a distance over the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundStrategy {
    RoutingService(RouteProfile),
    Geodesic,
}

impl GroundStrategy {
    pub async fn attempt(
        self,
        maps: &dyn MapsProvider,
        from: &Place,
        to: &Place,
    ) -> Result<(f64, DistanceSource), StrategyFailure> {
        match self {
            GroundStrategy::RoutingService(profile) => {
                let text = maps
                    .route_distance(from, to, profile)
                    .await
                    .map_err(StrategyFailure::Lookup)?;
                let km = parse_distance_km(&text)
                    .map_err(|error| StrategyFailure::Unparseable { text, error })?;
                Ok((km, DistanceSource::RoutingService))
            }
            GroundStrategy::Geodesic => Ok((geodesic_km(from, to), DistanceSource::Geodesic)),
        }
    }
}

/// Ways to pick the rail station serving a place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStrategy {
    /// Text search for a station in the place's city
    NamedStation,
    /// Closest station inside the search radius
    NearestStation,
}

impl StationStrategy {
    pub async fn attempt(
        self,
        maps: &dyn MapsProvider,
        place: &Place,
        radius_km: f64,
    ) -> Result<Hub, LookupError> {
        match self {
            StationStrategy::NamedStation => maps.named_station(&place.name).await,
            StationStrategy::NearestStation => {
                maps.nearest_hub(place, HubKind::RailStation, radius_km)
                    .await
            }
        }
    }
}

/// Ways to measure the flight between two airports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirStrategy {
    /// Offline table, keyed by the cities the airports are listed under
    OfflineByHubCity,
    /// Offline table, keyed by the cities the traveller named
    OfflineByTripCity,
    /// Straight line between the airports found by the maps service
    HubGeodesic,
}

impl AirStrategy {
    pub fn attempt(
        self,
        offline: &OfflineRouteTable,
        origin_hub: &Hub,
        destination_hub: &Hub,
        trip_cities: (&str, &str),
    ) -> Result<(f64, DistanceSource), StrategyFailure> {
        match self {
            AirStrategy::OfflineByHubCity => offline
                .air_distance_by_city(&origin_hub.nearby_city, &destination_hub.nearby_city)
                .map(|km| (km, DistanceSource::OfflineRouteTable))
                .ok_or(StrategyFailure::NoMatch),
            AirStrategy::OfflineByTripCity => offline
                .air_distance_by_city(trip_cities.0, trip_cities.1)
                .map(|km| (km, DistanceSource::OfflineRouteTable))
                .ok_or(StrategyFailure::NoMatch),
            AirStrategy::HubGeodesic => Ok((
                geodesic_km(&origin_hub.place, &destination_hub.place),
                DistanceSource::Geodesic,
            )),
        }
    }
}
