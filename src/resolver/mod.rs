//! Multi-hop distance resolution
//!
//! Turns a trip request into resolved legs:
//! - Road: one driving leg between the two cities
//! - Rail: one leg between the stations serving each city
//! - Air: drive to the airport, fly, drive from the airport
//!
//! Each measurement walks an ordered strategy list (see [`strategy`]).

pub mod strategy;

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::TripCarbonConfig;
use crate::emissions::EmissionFactors;
use crate::maps::{LookupError, MapsProvider};
use crate::models::{
    DistanceSource, Hub, HubKind, Place, TransportMode, TripLeg, TripRequest, Vehicle,
};
use crate::offline::OfflineRouteTable;
use strategy::{
    AIR_DISTANCE, AIRPORT_ACCESS_DISTANCE, GroundStrategy, RAIL_DISTANCE, ROAD_DISTANCE,
    STATION_LOOKUP, StrategyFailure,
};

/// Knobs the resolver needs from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub hub_radius_km: f64,
    pub short_rail_threshold_km: f64,
    pub ground_country: String,
    pub ground_access_vehicle: Vehicle,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from(&TripCarbonConfig::default())
    }
}

impl From<&TripCarbonConfig> for ResolverSettings {
    fn from(config: &TripCarbonConfig) -> Self {
        Self {
            hub_radius_km: config.search.hub_radius_km,
            short_rail_threshold_km: config.search.short_rail_threshold_km,
            ground_country: config.search.ground_country.clone(),
            ground_access_vehicle: config.emissions.ground_access_vehicle,
        }
    }
}

/// Why a trip could not be resolved
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{place} is in {}, {mode} travel is limited to {required}", .country.as_deref().unwrap_or("an unknown country"))]
    OutsideCountry {
        place: String,
        country: Option<String>,
        mode: TransportMode,
        required: String,
    },

    #[error("no distance data from {from} to {to}: {cause}")]
    NoDistance {
        from: String,
        to: String,
        cause: String,
    },
}

impl ResolveError {
    /// Message shown next to a skipped entry. Lookup and routing failures
    /// are not told apart.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ResolveError::OutsideCountry { mode, required, .. } => {
                format!("{mode} travel is only supported within {required}")
            }
            ResolveError::Lookup(_) | ResolveError::NoDistance { .. } => {
                "Distance data not available.".to_string()
            }
        }
    }
}

/// Non-fatal findings attached to a resolved trip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// Rail distance below the plausibility threshold
    ShortRailDistance { distance_km: f64, threshold_km: f64 },
    /// Routing service answered with text that is not a distance
    UnparseableDistance {
        from: String,
        to: String,
        text: String,
    },
    /// Straight-line distance used instead of a routed one
    GeodesicFallback { from: String, to: String },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::ShortRailDistance {
                distance_km,
                threshold_km,
            } => write!(
                f,
                "rail distance of {distance_km:.2} km is below {threshold_km} km, please double-check the stations"
            ),
            ResolutionWarning::UnparseableDistance { from, to, text } => write!(
                f,
                "routing service returned unreadable distance '{text}' for {from} → {to}"
            ),
            ResolutionWarning::GeodesicFallback { from, to } => {
                write!(f, "used straight-line distance for {from} → {to}")
            }
        }
    }
}

/// A trip turned into legs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTrip {
    pub request: TripRequest,
    pub legs: Vec<TripLeg>,
    pub warnings: Vec<ResolutionWarning>,
    /// Air trips only: whether the offline table lists a direct flight
    pub direct_route_known: Option<bool>,
}

impl ResolvedTrip {
    #[must_use]
    pub fn total_distance_km(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_km).sum()
    }

    #[must_use]
    pub fn total_emission_kg(&self) -> f64 {
        EmissionFactors::total_kg(&self.legs)
    }
}

/// Resolves trips against a maps backend and the offline route table
pub struct DistanceResolver<'a> {
    maps: &'a dyn MapsProvider,
    offline: &'a OfflineRouteTable,
    settings: ResolverSettings,
}

impl<'a> DistanceResolver<'a> {
    pub fn new(
        maps: &'a dyn MapsProvider,
        offline: &'a OfflineRouteTable,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            maps,
            offline,
            settings,
        }
    }

    /// Resolve one trip request into legs
    #[instrument(skip(self, request), fields(origin = %request.origin, destination = %request.destination, mode = %request.mode))]
    pub async fn resolve(&self, request: &TripRequest) -> Result<ResolvedTrip, ResolveError> {
        let origin = self.maps.resolve(&request.origin).await?;
        let destination = self.maps.resolve(&request.destination).await?;

        if request.mode.is_ground() {
            self.check_ground_country(&origin, request.mode)?;
            self.check_ground_country(&destination, request.mode)?;
        }

        let mut trip = ResolvedTrip {
            request: request.clone(),
            legs: Vec::new(),
            warnings: Vec::new(),
            direct_route_known: None,
        };

        match request.mode {
            TransportMode::Road => self.resolve_road(&origin, &destination, &mut trip).await?,
            TransportMode::Rail => self.resolve_rail(&origin, &destination, &mut trip).await?,
            TransportMode::Air => self.resolve_air(&origin, &destination, &mut trip).await?,
        }

        info!(
            "Resolved {} → {} by {}: {:.2} km, {:.2} kg CO2",
            request.origin,
            request.destination,
            request.mode,
            trip.total_distance_km(),
            trip.total_emission_kg()
        );
        Ok(trip)
    }

    async fn resolve_road(
        &self,
        origin: &Place,
        destination: &Place,
        trip: &mut ResolvedTrip,
    ) -> Result<(), ResolveError> {
        let (km, source) = self
            .ground_distance(origin, destination, ROAD_DISTANCE, &mut trip.warnings)
            .await?;
        trip.legs.push(leg(
            trip.request.vehicle,
            origin,
            destination,
            km,
            source,
        ));
        Ok(())
    }

    async fn resolve_rail(
        &self,
        origin: &Place,
        destination: &Place,
        trip: &mut ResolvedTrip,
    ) -> Result<(), ResolveError> {
        if origin.same_coordinates(destination) {
            trip.legs.push(leg(
                trip.request.vehicle,
                origin,
                destination,
                0.0,
                DistanceSource::SamePlace,
            ));
            return Ok(());
        }

        let origin_station = self.find_station(origin).await?;
        let destination_station = self.find_station(destination).await?;

        let (km, source) = self
            .ground_distance(
                &origin_station.place,
                &destination_station.place,
                RAIL_DISTANCE,
                &mut trip.warnings,
            )
            .await?;

        if km < self.settings.short_rail_threshold_km {
            warn!(
                "Suspiciously short rail distance {:.2} km between {} and {}",
                km,
                origin_station.name(),
                destination_station.name()
            );
            trip.warnings.push(ResolutionWarning::ShortRailDistance {
                distance_km: km,
                threshold_km: self.settings.short_rail_threshold_km,
            });
        }

        trip.legs.push(leg(
            trip.request.vehicle,
            &origin_station.place,
            &destination_station.place,
            km,
            source,
        ));
        Ok(())
    }

    async fn resolve_air(
        &self,
        origin: &Place,
        destination: &Place,
        trip: &mut ResolvedTrip,
    ) -> Result<(), ResolveError> {
        let radius = self.settings.hub_radius_km;
        let origin_hub = self
            .maps
            .nearest_hub(origin, HubKind::Airport, radius)
            .await?;
        let destination_hub = self
            .maps
            .nearest_hub(destination, HubKind::Airport, radius)
            .await?;

        let (to_hub, to_hub_source) = self
            .ground_distance(
                origin,
                &origin_hub.place,
                AIRPORT_ACCESS_DISTANCE,
                &mut trip.warnings,
            )
            .await?;
        let (hub_to_hub, air_source) = self.air_distance(&origin_hub, &destination_hub, trip);
        let (from_hub, from_hub_source) = self
            .ground_distance(
                &destination_hub.place,
                destination,
                AIRPORT_ACCESS_DISTANCE,
                &mut trip.warnings,
            )
            .await?;

        let access = self.settings.ground_access_vehicle;
        trip.legs.push(leg(access, origin, &origin_hub.place, to_hub, to_hub_source));
        trip.legs.push(leg(
            trip.request.vehicle,
            &origin_hub.place,
            &destination_hub.place,
            hub_to_hub,
            air_source,
        ));
        trip.legs.push(leg(
            access,
            &destination_hub.place,
            destination,
            from_hub,
            from_hub_source,
        ));

        trip.direct_route_known = Some(
            self.offline
                .has_direct_route(&origin_hub.nearby_city, &destination_hub.nearby_city)
                || self
                    .offline
                    .has_direct_route(&trip.request.origin, &trip.request.destination),
        );
        Ok(())
    }

    fn check_ground_country(&self, place: &Place, mode: TransportMode) -> Result<(), ResolveError> {
        if place.is_in_country(&self.settings.ground_country) {
            Ok(())
        } else {
            Err(ResolveError::OutsideCountry {
                place: place.name.clone(),
                country: place.country.clone(),
                mode,
                required: self.settings.ground_country.clone(),
            })
        }
    }

    /// Walk the station strategies; the last failure is reported
    async fn find_station(&self, place: &Place) -> Result<Hub, ResolveError> {
        let mut last_error = None;
        for strategy in STATION_LOOKUP {
            match strategy
                .attempt(self.maps, place, self.settings.hub_radius_km)
                .await
            {
                Ok(hub) => {
                    debug!("{:?} found {} for {}", strategy, hub.name(), place.name);
                    return Ok(hub);
                }
                Err(e) => {
                    debug!("{:?} failed for {}: {}", strategy, place.name, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| LookupError::NotFound(format!("rail station in {}", place.name)))
            .into())
    }

    /// Walk ground strategies. Identical coordinates are 0 km without asking
    /// anyone.
    async fn ground_distance(
        &self,
        from: &Place,
        to: &Place,
        strategies: &[GroundStrategy],
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Result<(f64, DistanceSource), ResolveError> {
        if from.same_coordinates(to) {
            return Ok((0.0, DistanceSource::SamePlace));
        }

        let mut last_failure = StrategyFailure::NoMatch;
        for (index, strategy) in strategies.iter().enumerate() {
            match strategy.attempt(self.maps, from, to).await {
                Ok((km, source)) => {
                    if source == DistanceSource::Geodesic && index > 0 {
                        warnings.push(ResolutionWarning::GeodesicFallback {
                            from: from.name.clone(),
                            to: to.name.clone(),
                        });
                    }
                    return Ok((km, source));
                }
                Err(StrategyFailure::Unparseable { text, error }) => {
                    warn!("Unreadable distance from {} to {}: {}", from.name, to.name, error);
                    warnings.push(ResolutionWarning::UnparseableDistance {
                        from: from.name.clone(),
                        to: to.name.clone(),
                        text: text.clone(),
                    });
                    last_failure = StrategyFailure::Unparseable { text, error };
                }
                Err(failure) => {
                    warn!("{:?} failed for {} → {}: {}", strategy, from.name, to.name, failure);
                    last_failure = failure;
                }
            }
        }

        Err(ResolveError::NoDistance {
            from: from.name.clone(),
            to: to.name.clone(),
            cause: last_failure.to_string(),
        })
    }

    /// Walk the air strategies; the last one cannot fail
    fn air_distance(
        &self,
        origin_hub: &Hub,
        destination_hub: &Hub,
        trip: &ResolvedTrip,
    ) -> (f64, DistanceSource) {
        let cities = (trip.request.origin.as_str(), trip.request.destination.as_str());
        for strategy in AIR_DISTANCE {
            match strategy.attempt(self.offline, origin_hub, destination_hub, cities) {
                Ok(found) => {
                    debug!("{:?} gave {:.2} km", strategy, found.0);
                    return found;
                }
                Err(failure) => debug!("{:?}: {}", strategy, failure),
            }
        }
        (
            crate::geodesic::geodesic_km(&origin_hub.place, &destination_hub.place),
            DistanceSource::Geodesic,
        )
    }
}

fn leg(vehicle: Vehicle, from: &Place, to: &Place, km: f64, source: DistanceSource) -> TripLeg {
    TripLeg {
        mode: vehicle.mode(),
        vehicle,
        origin: from.clone(),
        destination: to.clone(),
        distance_km: km,
        emission_kg: EmissionFactors::emission_kg(vehicle, km),
        source,
    }
}
