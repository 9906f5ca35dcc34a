//! Trip requests, resolved legs and the request-scoped trip list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Place;
use crate::TripCarbonError;

/// Transport mode of a trip
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Road,
    Rail,
    Air,
}

impl TransportMode {
    /// Vehicle used when the request does not name one
    #[must_use]
    pub fn default_vehicle(self) -> Vehicle {
        match self {
            TransportMode::Road => Vehicle::PetrolCar,
            TransportMode::Rail => Vehicle::ElectricTrain,
            TransportMode::Air => Vehicle::DomesticFlight,
        }
    }

    /// Road and rail trips are only supported within one country
    #[must_use]
    pub fn is_ground(self) -> bool {
        matches!(self, TransportMode::Road | TransportMode::Rail)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Road => write!(f, "road"),
            TransportMode::Rail => write!(f, "rail"),
            TransportMode::Air => write!(f, "air"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = TripCarbonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" | "car" | "driving" => Ok(TransportMode::Road),
            "rail" | "train" => Ok(TransportMode::Rail),
            "air" | "flight" | "plane" => Ok(TransportMode::Air),
            other => Err(TripCarbonError::validation(format!(
                "unknown transport mode '{other}'. Must be one of: road, rail, air"
            ))),
        }
    }
}

/// Vehicle subtype, each belonging to exactly one mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Vehicle {
    PetrolCar,
    DieselCar,
    CngCar,
    ElectricCar,
    Motorcycle,
    Bus,
    Truck,
    ElectricTrain,
    DieselTrain,
    DomesticFlight,
    InternationalFlight,
}

impl Vehicle {
    pub const ALL: [Vehicle; 11] = [
        Vehicle::PetrolCar,
        Vehicle::DieselCar,
        Vehicle::CngCar,
        Vehicle::ElectricCar,
        Vehicle::Motorcycle,
        Vehicle::Bus,
        Vehicle::Truck,
        Vehicle::ElectricTrain,
        Vehicle::DieselTrain,
        Vehicle::DomesticFlight,
        Vehicle::InternationalFlight,
    ];

    #[must_use]
    pub fn mode(self) -> TransportMode {
        match self {
            Vehicle::PetrolCar
            | Vehicle::DieselCar
            | Vehicle::CngCar
            | Vehicle::ElectricCar
            | Vehicle::Motorcycle
            | Vehicle::Bus
            | Vehicle::Truck => TransportMode::Road,
            Vehicle::ElectricTrain | Vehicle::DieselTrain => TransportMode::Rail,
            Vehicle::DomesticFlight | Vehicle::InternationalFlight => TransportMode::Air,
        }
    }

    /// Short label accepted on the command line within a mode
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Vehicle::PetrolCar => "petrol",
            Vehicle::DieselCar => "diesel",
            Vehicle::CngCar => "cng",
            Vehicle::ElectricCar => "electric",
            Vehicle::Motorcycle => "motorcycle",
            Vehicle::Bus => "bus",
            Vehicle::Truck => "truck",
            Vehicle::ElectricTrain => "electric",
            Vehicle::DieselTrain => "diesel",
            Vehicle::DomesticFlight => "domestic",
            Vehicle::InternationalFlight => "international",
        }
    }

    /// Parse a vehicle label in the context of a mode ("electric" is a car
    /// on the road and a train on rail)
    pub fn parse_for_mode(mode: TransportMode, label: &str) -> crate::Result<Self> {
        let wanted = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.mode() == mode && v.label() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL
                    .into_iter()
                    .filter(|v| v.mode() == mode)
                    .map(Vehicle::label)
                    .collect();
                TripCarbonError::validation(format!(
                    "unknown {mode} vehicle '{wanted}'. Must be one of: {}",
                    valid.join(", ")
                ))
            })
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vehicle::PetrolCar => "Car (Petrol)",
            Vehicle::DieselCar => "Car (Diesel)",
            Vehicle::CngCar => "Car (CNG)",
            Vehicle::ElectricCar => "Car (Electric)",
            Vehicle::Motorcycle => "Motorcycle",
            Vehicle::Bus => "Bus",
            Vehicle::Truck => "Truck",
            Vehicle::ElectricTrain => "Electric train",
            Vehicle::DieselTrain => "Diesel train",
            Vehicle::DomesticFlight => "Domestic flight",
            Vehicle::InternationalFlight => "International flight",
        };
        f.write_str(name)
    }
}

/// One row of user input
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub mode: TransportMode,
    pub vehicle: Vehicle,
}

impl TripRequest {
    /// Create a request, rejecting blank places and vehicles of another mode
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        mode: TransportMode,
        vehicle: Vehicle,
    ) -> crate::Result<Self> {
        let origin = origin.into().trim().to_string();
        let destination = destination.into().trim().to_string();

        if origin.is_empty() || destination.is_empty() {
            return Err(TripCarbonError::validation(
                "origin and destination must not be empty",
            ));
        }
        if vehicle.mode() != mode {
            return Err(TripCarbonError::validation(format!(
                "vehicle '{vehicle}' cannot be used for {mode} travel"
            )));
        }

        Ok(Self {
            origin,
            destination,
            mode,
            vehicle,
        })
    }
}

/// Parses `ORIGIN,DESTINATION,MODE[,VEHICLE]`
impl FromStr for TripRequest {
    type Err = TripCarbonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [origin, destination, mode] => {
                let mode: TransportMode = mode.parse()?;
                Self::new(*origin, *destination, mode, mode.default_vehicle())
            }
            [origin, destination, mode, vehicle] => {
                let mode: TransportMode = mode.parse()?;
                let vehicle = Vehicle::parse_for_mode(mode, vehicle)?;
                Self::new(*origin, *destination, mode, vehicle)
            }
            _ => Err(TripCarbonError::validation(format!(
                "expected ORIGIN,DESTINATION,MODE[,VEHICLE], got '{s}'"
            ))),
        }
    }
}

/// Where a leg's distance came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    RoutingService,
    Geodesic,
    OfflineRouteTable,
    /// Origin and destination share coordinates
    SamePlace,
}

impl fmt::Display for DistanceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceSource::RoutingService => write!(f, "routing service"),
            DistanceSource::Geodesic => write!(f, "straight line"),
            DistanceSource::OfflineRouteTable => write!(f, "offline route table"),
            DistanceSource::SamePlace => write!(f, "same place"),
        }
    }
}

/// One resolved segment of a journey
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripLeg {
    pub mode: TransportMode,
    pub vehicle: Vehicle,
    pub origin: Place,
    pub destination: Place,
    pub distance_km: f64,
    pub emission_kg: f64,
    pub source: DistanceSource,
}

/// Explicit, request-scoped list of trip entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripList {
    entries: Vec<TripRequest>,
}

impl TripList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, trip: TripRequest) {
        self.entries.push(trip);
    }

    /// Remove the entry at `index`, if there is one
    pub fn remove(&mut self, index: usize) -> Option<TripRequest> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRequest> {
        self.entries.iter()
    }
}

impl FromIterator<TripRequest> for TripList {
    fn from_iter<I: IntoIterator<Item = TripRequest>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TripList {
    type Item = &'a TripRequest;
    type IntoIter = std::slice::Iter<'a, TripRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
