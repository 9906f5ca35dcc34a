//! Offline flight route table
//!
//! Loads header-less OpenFlights `airports.csv` and `routes.csv` files once
//! and answers city-to-city air distance questions without the network.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::geodesic::geodesic_km;
use crate::models::Place;
use crate::{Result, TripCarbonError};

// Column positions in the OpenFlights tables
const AIRPORT_CITY: usize = 2;
const AIRPORT_COUNTRY: usize = 3;
const AIRPORT_IATA: usize = 4;
const AIRPORT_LATITUDE: usize = 6;
const AIRPORT_LONGITUDE: usize = 7;
const ROUTE_SOURCE: usize = 2;
const ROUTE_DESTINATION: usize = 4;

/// An airport row from the offline table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfflineAirport {
    pub city: String,
    pub iata: Option<String>,
    pub place: Place,
}

/// Read-only city → airport table with known direct routes
#[derive(Debug, Clone, Default)]
pub struct OfflineRouteTable {
    /// Keyed by lowercased city, in file order
    airports: HashMap<String, Vec<OfflineAirport>>,
    /// (source IATA, destination IATA)
    routes: HashSet<(String, String)>,
}

impl OfflineRouteTable {
    /// Load both tables from disk. A missing routes file only disables
    /// direct-route lookups.
    pub fn from_paths(airports_csv: &Path, routes_csv: &Path) -> Result<Self> {
        let airports = fs::File::open(airports_csv).map_err(|e| {
            TripCarbonError::data(format!(
                "cannot open airports table {}: {e}",
                airports_csv.display()
            ))
        })?;

        let table = if routes_csv.exists() {
            Self::from_readers(airports, fs::File::open(routes_csv)?)?
        } else {
            warn!(
                "Routes table {} not found, direct route lookups disabled",
                routes_csv.display()
            );
            Self::from_readers(airports, std::io::empty())?
        };

        info!(
            "Loaded offline route table: {} cities, {} routes",
            table.airports.len(),
            table.routes.len()
        );
        Ok(table)
    }

    /// Load from any readers (files or in-memory buffers)
    pub fn from_readers<A: Read, R: Read>(airports: A, routes: R) -> Result<Self> {
        let mut table = Self::default();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::Fields)
            .from_reader(airports);

        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| {
                TripCarbonError::data(format!("failed to read airports table: {e}"))
            })?;
            match parse_airport(&record) {
                Some(airport) => table
                    .airports
                    .entry(airport.city.to_lowercase())
                    .or_default()
                    .push(airport),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("Skipped {} incomplete airport rows", skipped);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::Fields)
            .from_reader(routes);

        for record in reader.records() {
            let record = record
                .map_err(|e| TripCarbonError::data(format!("failed to read routes table: {e}")))?;
            let source = record.get(ROUTE_SOURCE).and_then(non_null);
            let destination = record.get(ROUTE_DESTINATION).and_then(non_null);
            if let (Some(source), Some(destination)) = (source, destination) {
                table
                    .routes
                    .insert((source.to_uppercase(), destination.to_uppercase()));
            }
        }

        Ok(table)
    }

    /// First airport listed for a city, case-insensitive
    #[must_use]
    pub fn airport_for_city(&self, city: &str) -> Option<&OfflineAirport> {
        self.airports
            .get(&city.trim().to_lowercase())
            .and_then(|airports| airports.first())
    }

    /// Geodesic distance between the airports of two cities, if both are known
    #[must_use]
    pub fn air_distance_by_city(&self, origin_city: &str, destination_city: &str) -> Option<f64> {
        let origin = self.airport_for_city(origin_city)?;
        let destination = self.airport_for_city(destination_city)?;
        Some(geodesic_km(&origin.place, &destination.place))
    }

    /// Whether any airport of the origin city has a listed flight to any
    /// airport of the destination city
    #[must_use]
    pub fn has_direct_route(&self, origin_city: &str, destination_city: &str) -> bool {
        let codes = |city: &str| -> Vec<&str> {
            self.airports
                .get(&city.trim().to_lowercase())
                .map(|airports| airports.iter().filter_map(|a| a.iata.as_deref()).collect())
                .unwrap_or_default()
        };

        let origins = codes(origin_city);
        let destinations = codes(destination_city);
        origins.iter().any(|o| {
            destinations
                .iter()
                .any(|d| self.routes.contains(&(o.to_string(), d.to_string())))
        })
    }

    /// Number of distinct cities with at least one airport
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

/// OpenFlights writes `\N` for missing values
fn non_null(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != "\\N").then_some(value)
}

fn parse_airport(record: &StringRecord) -> Option<OfflineAirport> {
    let city = record.get(AIRPORT_CITY).and_then(non_null)?;
    let latitude: f64 = record.get(AIRPORT_LATITUDE)?.parse().ok()?;
    let longitude: f64 = record.get(AIRPORT_LONGITUDE)?.parse().ok()?;
    let iata = record
        .get(AIRPORT_IATA)
        .and_then(non_null)
        .map(str::to_uppercase);

    let name = format!("{} airport", iata.as_deref().unwrap_or(city));
    let place = match record.get(AIRPORT_COUNTRY).and_then(non_null) {
        Some(country) => Place::with_country(name, latitude, longitude, country),
        None => Place::new(name, latitude, longitude),
    };

    Some(OfflineAirport {
        city: city.to_string(),
        iata,
        place,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = r#"2997,"Chhatrapati Shivaji International Airport","Mumbai","India","BOM","VABB",19.0886993408,72.8678970337,39,5.5,"N","Asia/Calcutta","airport","OurAirports"
3093,"Indira Gandhi International Airport","Delhi","India","DEL","VIDP",28.5665,77.103104,777,5.5,"N","Asia/Calcutta","airport","OurAirports"
9999,"Juhu Aerodrome","Mumbai","India","\N","VAJJ",19.098100662231445,72.83419799804688,13,5.5,"N","Asia/Calcutta","airport","OurAirports"
1,"Broken row","","Nowhere","XXX","XXXX",abc,def,0,0,"N","\N","airport","OurAirports"
"#;

    const ROUTES: &str = "AI,3,BOM,2997,DEL,3093,,0,320\n";

    fn table() -> OfflineRouteTable {
        OfflineRouteTable::from_readers(AIRPORTS.as_bytes(), ROUTES.as_bytes()).unwrap()
    }

    #[test]
    fn test_first_airport_per_city_wins() {
        let table = table();
        assert_eq!(table.city_count(), 2);

        let mumbai = table.airport_for_city("mumbai").unwrap();
        assert_eq!(mumbai.iata.as_deref(), Some("BOM"));
        assert_eq!(mumbai.place.country.as_deref(), Some("India"));
    }

    #[test]
    fn test_air_distance_by_city() {
        let table = table();
        let there = table.air_distance_by_city("Mumbai", "Delhi").unwrap();
        let back = table.air_distance_by_city("DELHI", "mumbai").unwrap();
        assert!((there - back).abs() < 1e-9);
        assert!(there > 1100.0 && there < 1160.0, "{there}");
        assert!(table.air_distance_by_city("Mumbai", "Atlantis").is_none());
    }

    #[test]
    fn test_direct_routes() {
        let table = table();
        assert_eq!(table.route_count(), 1);
        assert!(table.has_direct_route("Mumbai", "Delhi"));
        assert!(!table.has_direct_route("Delhi", "Mumbai"));
    }

    #[test]
    fn test_missing_routes_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let airports = dir.path().join("airports.csv");
        fs::write(&airports, AIRPORTS).unwrap();

        let table =
            OfflineRouteTable::from_paths(&airports, &dir.path().join("routes.csv")).unwrap();
        assert_eq!(table.route_count(), 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_missing_airports_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = OfflineRouteTable::from_paths(
            &dir.path().join("airports.csv"),
            &dir.path().join("routes.csv"),
        );
        assert!(matches!(result, Err(TripCarbonError::Data { .. })));
    }
}
