//! Configuration management for `TripCarbon`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripCarbonError;
use crate::models::{TransportMode, Vehicle};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `TripCarbon`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripCarbonConfig {
    /// Maps service (geocoding, places, routing)
    #[serde(default)]
    pub maps: MapsConfig,
    /// Offline flight data
    #[serde(default)]
    pub data: DataConfig,
    /// Hub search and resolution settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Emission settings
    #[serde(default)]
    pub emissions: EmissionsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Maps service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// API key sent with every maps request
    pub api_key: Option<String>,
    /// Base URL of the maps JSON API
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
}

/// Offline route table locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// OpenFlights airports table
    #[serde(default = "default_airports_csv")]
    pub airports_csv: String,
    /// OpenFlights routes table
    #[serde(default = "default_routes_csv")]
    pub routes_csv: String,
}

/// Hub search and resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius for nearest-hub searches in kilometers
    #[serde(default = "default_hub_radius")]
    pub hub_radius_km: f64,
    /// Rail distances below this are flagged as suspicious
    #[serde(default = "default_short_rail_threshold")]
    pub short_rail_threshold_km: f64,
    /// Country both endpoints of a road or rail trip must be in
    #[serde(default = "default_ground_country")]
    pub ground_country: String,
}

/// Emission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionsConfig {
    /// Vehicle charged for the drive to and from the airport
    #[serde(default = "default_ground_access_vehicle")]
    pub ground_access_vehicle: Vehicle,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Largest radius the places nearby search accepts
pub const MAX_HUB_RADIUS_KM: f64 = 50.0;

// Default value functions
fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_airports_csv() -> String {
    "airports.csv".to_string()
}

fn default_routes_csv() -> String {
    "routes.csv".to_string()
}

fn default_hub_radius() -> f64 {
    50.0
}

fn default_short_rail_threshold() -> f64 {
    10.0
}

fn default_ground_country() -> String {
    "India".to_string()
}

fn default_ground_access_vehicle() -> Vehicle {
    Vehicle::PetrolCar
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_maps_base_url(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            airports_csv: default_airports_csv(),
            routes_csv: default_routes_csv(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hub_radius_km: default_hub_radius(),
            short_rail_threshold_km: default_short_rail_threshold(),
            ground_country: default_ground_country(),
        }
    }
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            ground_access_vehicle: default_ground_access_vehicle(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TripCarbonConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPCARBON_MAPS__API_KEY, TRIPCARBON_SEARCH__HUB_RADIUS_KM, ...
        builder = builder.add_source(
            Environment::with_prefix("TRIPCARBON")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripCarbonConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripcarbon").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.maps.base_url.is_empty() {
            self.maps.base_url = default_maps_base_url();
        }
        if self.data.airports_csv.is_empty() {
            self.data.airports_csv = default_airports_csv();
        }
        if self.data.routes_csv.is_empty() {
            self.data.routes_csv = default_routes_csv();
        }
        if self.search.hub_radius_km == 0.0 {
            self.search.hub_radius_km = default_hub_radius();
        }
        if self.search.ground_country.is_empty() {
            self.search.ground_country = default_ground_country();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.maps.api_key {
            if api_key.is_empty() {
                return Err(TripCarbonError::config(
                    "Maps API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(TripCarbonError::config(
                    "Maps API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(TripCarbonError::config(
                    "Maps API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(self.search.hub_radius_km > 0.0 && self.search.hub_radius_km <= MAX_HUB_RADIUS_KM) {
            return Err(TripCarbonError::config(format!(
                "Hub search radius must be between 0 and {MAX_HUB_RADIUS_KM} km"
            ))
            .into());
        }

        if !(self.search.short_rail_threshold_km >= 0.0) {
            return Err(TripCarbonError::config(
                "Short rail distance threshold cannot be negative",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripCarbonError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripCarbonError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.maps.base_url.starts_with("http://") && !self.maps.base_url.starts_with("https://")
        {
            return Err(TripCarbonError::config(
                "Maps API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.emissions.ground_access_vehicle.mode() != TransportMode::Road {
            return Err(TripCarbonError::config(format!(
                "Ground access vehicle must be a road vehicle, got '{}'",
                self.emissions.ground_access_vehicle
            ))
            .into());
        }

        Ok(())
    }
}
