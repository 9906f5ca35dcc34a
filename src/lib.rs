//! `TripCarbon` - travel distance and CO2 emission estimation
//!
//! This library resolves road, rail and air trips between two named places
//! into distances, combining a maps service (geocoding, places, routing)
//! with an offline flight-route table, and converts the result into
//! emissions using a fixed per-km factor table.

pub mod calculator;
pub mod config;
pub mod emissions;
pub mod error;
pub mod geodesic;
pub mod logging;
pub mod maps;
pub mod models;
pub mod offline;
pub mod report;
pub mod resolver;

// Re-export core types for public API
pub use calculator::{CalculationReport, EntryOutcome, TripCalculator};
pub use config::TripCarbonConfig;
pub use emissions::EmissionFactors;
pub use error::TripCarbonError;
pub use geodesic::{extract_distance, geodesic_km, parse_distance_km};
pub use maps::{GoogleMapsClient, StaticMaps};
pub use models::{Hub, HubKind, Place, TransportMode, TripLeg, TripList, TripRequest, Vehicle};
pub use offline::OfflineRouteTable;
pub use resolver::DistanceResolver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripCarbonError>;
