//! Straight-line distances and distance-text parsing

use haversine::{Location as HaversineLocation, Units, distance};
use thiserror::Error;
use tracing::warn;

use crate::models::Place;

const KM_PER_MILE: f64 = 1.609_344;

/// Great-circle distance between two places in kilometers.
///
/// Spherical approximation: it differs from an ellipsoidal geodesic by up
/// to about 0.5%.
#[must_use]
pub fn geodesic_km(from: &Place, to: &Place) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// Why a distance text could not be read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistanceParseError {
    #[error("distance text is empty")]
    Empty,

    #[error("no number in distance text '{0}'")]
    NotNumeric(String),

    #[error("unknown distance unit '{unit}' in '{text}'")]
    UnknownUnit { text: String, unit: String },
}

/// Parse a routing-service distance such as `"1,234.5 km"`, `"850 m"` or
/// `"12 mi"` into kilometers. A bare number is taken as kilometers.
pub fn parse_distance_km(text: &str) -> Result<f64, DistanceParseError> {
    let cleaned = text.trim().replace(',', "").to_ascii_lowercase();
    if cleaned.is_empty() {
        return Err(DistanceParseError::Empty);
    }

    let split = cleaned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(cleaned.len());
    let (number, unit) = cleaned.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| DistanceParseError::NotNumeric(text.to_string()))?;

    let factor = match unit.trim() {
        "" | "km" | "kms" | "kilometers" | "kilometres" => 1.0,
        "m" | "meters" | "metres" => 0.001,
        "mi" | "mile" | "miles" => KM_PER_MILE,
        other => {
            return Err(DistanceParseError::UnknownUnit {
                text: text.to_string(),
                unit: other.to_string(),
            });
        }
    };

    Ok(value * factor)
}

/// Lenient variant of [`parse_distance_km`]: unreadable text becomes `0.0`.
///
/// Only for callers that accept a zero distance; the resolver uses the
/// strict parser and reports failures as warnings instead.
#[must_use]
pub fn extract_distance(text: &str) -> f64 {
    parse_distance_km(text).unwrap_or_else(|e| {
        warn!("Treating unreadable distance as 0 km: {}", e);
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123.4 km", 123.4)]
    #[case("1,234 km", 1234.0)]
    #[case("  56 KM ", 56.0)]
    #[case("42", 42.0)]
    #[case("850 m", 0.85)]
    #[case("10 mi", 16.093_44)]
    fn test_parse_distance_km(#[case] text: &str, #[case] expected: f64) {
        let km = parse_distance_km(text).unwrap();
        assert!((km - expected).abs() < 1e-9, "{text} -> {km}");
    }

    #[rstest]
    #[case("")]
    #[case("no data")]
    #[case("km")]
    fn test_parse_distance_rejects_non_numeric(#[case] text: &str) {
        assert!(parse_distance_km(text).is_err());
    }

    #[test]
    fn test_parse_distance_unknown_unit() {
        let err = parse_distance_km("12 furlongs").unwrap_err();
        assert!(matches!(err, DistanceParseError::UnknownUnit { .. }));
    }

    #[test]
    fn test_extract_distance() {
        assert_eq!(extract_distance("123.4 km"), 123.4);
        assert_eq!(extract_distance("unknown"), 0.0);
    }

    #[test]
    fn test_geodesic_is_symmetric_and_zero_on_self() {
        let mumbai = Place::new("Mumbai", 19.0896, 72.8656);
        let delhi = Place::new("Delhi", 28.5665, 77.1031);

        let there = geodesic_km(&mumbai, &delhi);
        let back = geodesic_km(&delhi, &mumbai);
        assert!((there - back).abs() < 1e-9);
        assert!(there > 1000.0 && there < 1200.0);
        assert_eq!(geodesic_km(&mumbai, &mumbai), 0.0);
    }
}
