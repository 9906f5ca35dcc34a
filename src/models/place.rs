//! Place and hub models for geographic coordinates and metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named point on the map
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// Place name as the user or the maps service spelled it
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Country name as reported by the geocoder
    pub country: Option<String>,
}

impl Place {
    /// Create a new place without country information
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: None,
        }
    }

    /// Create a place with country
    #[must_use]
    pub fn with_country(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: Some(country.into()),
        }
    }

    /// Coordinates in the `lat,lng` form the maps endpoints expect
    #[must_use]
    pub fn query_coordinates(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Whether both places sit on exactly the same coordinates
    #[must_use]
    pub fn same_coordinates(&self, other: &Place) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }

    /// Case-insensitive country check; an unknown country never matches
    #[must_use]
    pub fn is_in_country(&self, country: &str) -> bool {
        self.country
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case(country.trim()))
    }
}

/// Kind of transport hub
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HubKind {
    Airport,
    RailStation,
}

impl HubKind {
    /// Place type used by the places search endpoints
    #[must_use]
    pub fn place_type(self) -> &'static str {
        match self {
            HubKind::Airport => "airport",
            HubKind::RailStation => "train_station",
        }
    }
}

impl fmt::Display for HubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HubKind::Airport => write!(f, "airport"),
            HubKind::RailStation => write!(f, "rail station"),
        }
    }
}

/// An airport or rail station together with the city it serves
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hub {
    pub place: Place,
    pub kind: HubKind,
    /// City the hub is listed under, used for offline table lookups
    pub nearby_city: String,
}

impl Hub {
    #[must_use]
    pub fn new(place: Place, kind: HubKind, nearby_city: impl Into<String>) -> Self {
        Self {
            place,
            kind,
            nearby_city: nearby_city.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.place.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_coordinates() {
        let place = Place::new("Mumbai", 19.076, 72.8777);
        assert_eq!(place.query_coordinates(), "19.076,72.8777");
    }

    #[test]
    fn test_country_match_is_case_insensitive() {
        let place = Place::with_country("Pune", 18.52, 73.85, "India");
        assert!(place.is_in_country("india"));
        assert!(place.is_in_country(" INDIA "));
        assert!(!place.is_in_country("Nepal"));

        let unknown = Place::new("Nowhere", 0.0, 0.0);
        assert!(!unknown.is_in_country("India"));
    }

    #[test]
    fn test_hub_kind_place_type() {
        assert_eq!(HubKind::Airport.place_type(), "airport");
        assert_eq!(HubKind::RailStation.place_type(), "train_station");
        assert_eq!(HubKind::RailStation.to_string(), "rail station");
    }
}
