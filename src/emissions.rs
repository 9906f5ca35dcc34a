//! Per-km CO2 emission factors

use crate::models::{TripLeg, Vehicle};

/// Fixed emission factor table, in kg CO2 per km travelled
pub struct EmissionFactors;

impl EmissionFactors {
    #[must_use]
    pub const fn kg_per_km(vehicle: Vehicle) -> f64 {
        match vehicle {
            Vehicle::PetrolCar => 0.187,
            Vehicle::DieselCar => 0.171,
            Vehicle::CngCar => 0.142,
            Vehicle::ElectricCar => 0.053,
            Vehicle::Motorcycle => 0.103,
            Vehicle::Bus => 0.105,
            Vehicle::Truck => 0.620,
            Vehicle::ElectricTrain => 0.82,
            Vehicle::DieselTrain => 1.05,
            Vehicle::DomesticFlight => 1.58,
            Vehicle::InternationalFlight => 1.02,
        }
    }

    #[must_use]
    pub fn emission_kg(vehicle: Vehicle, distance_km: f64) -> f64 {
        distance_km * Self::kg_per_km(vehicle)
    }

    /// Every vehicle with its factor, in display order
    #[must_use]
    pub fn table() -> Vec<(Vehicle, f64)> {
        Vehicle::ALL
            .into_iter()
            .map(|v| (v, Self::kg_per_km(v)))
            .collect()
    }

    /// Sum of leg emissions
    #[must_use]
    pub fn total_kg<'a>(legs: impl IntoIterator<Item = &'a TripLeg>) -> f64 {
        legs.into_iter().map(|leg| leg.emission_kg).sum()
    }
}
