//! Resolver and calculator behaviour against the bundled fixture backend

use std::path::PathBuf;

use rstest::rstest;

use tripcarbon::calculator::EntryOutcome;
use tripcarbon::emissions::EmissionFactors;
use tripcarbon::geodesic::geodesic_km;
use tripcarbon::models::DistanceSource;
use tripcarbon::resolver::{ResolutionWarning, ResolveError, ResolverSettings};
use tripcarbon::{
    DistanceResolver, OfflineRouteTable, StaticMaps, TransportMode, TripCalculator, TripList,
    TripRequest, Vehicle,
};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn maps() -> StaticMaps {
    StaticMaps::from_json_file(&data_path("fixture_india.json")).unwrap()
}

fn offline() -> OfflineRouteTable {
    OfflineRouteTable::from_paths(&data_path("airports.csv"), &data_path("routes.csv")).unwrap()
}

fn trip(input: &str) -> TripRequest {
    input.parse().unwrap()
}

#[tokio::test]
async fn test_road_trip_uses_routing_distance() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let resolved = resolver.resolve(&trip("Mumbai,Pune,road")).await.unwrap();
    assert_eq!(resolved.legs.len(), 1);

    let leg = &resolved.legs[0];
    assert_eq!(leg.distance_km, 148.0);
    assert_eq!(leg.source, DistanceSource::RoutingService);
    assert_eq!(leg.vehicle, Vehicle::PetrolCar);
    assert!((leg.emission_kg - 148.0 * 0.187).abs() < 1e-9);
    assert!(resolved.warnings.is_empty());
}

#[rstest]
#[case("Mumbai,Mumbai,road")]
#[case("Pune,pune,rail")]
#[tokio::test]
async fn test_same_origin_and_destination_is_zero(#[case] input: &str) {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let resolved = resolver.resolve(&trip(input)).await.unwrap();
    assert_eq!(resolved.total_distance_km(), 0.0);
    assert_eq!(resolved.total_emission_kg(), 0.0);
    assert_eq!(resolved.legs[0].source, DistanceSource::SamePlace);
}

#[tokio::test]
async fn test_road_without_route_reports_no_data() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let err = resolver
        .resolve(&trip("Mumbai,Delhi,road"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::NoDistance { .. }));
    assert_eq!(err.user_message(), "Distance data not available.");
}

#[rstest]
#[case("Paris,Mumbai,road", TransportMode::Road)]
#[case("Mumbai,Paris,rail", TransportMode::Rail)]
#[tokio::test]
async fn test_ground_travel_outside_india_is_rejected(
    #[case] input: &str,
    #[case] mode: TransportMode,
) {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let err = resolver.resolve(&trip(input)).await.unwrap_err();
    match err {
        ResolveError::OutsideCountry {
            place,
            mode: rejected_mode,
            required,
            ..
        } => {
            assert_eq!(place, "Paris");
            assert_eq!(rejected_mode, mode);
            assert_eq!(required, "India");
        }
        other => panic!("expected OutsideCountry, got {other:?}"),
    }
}

#[tokio::test]
async fn test_air_travel_is_not_limited_to_india() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    // Paris has no airport in the fixture, so this fails on the hub, not on the country
    let err = resolver.resolve(&trip("Paris,Mumbai,air")).await.unwrap_err();
    assert!(matches!(err, ResolveError::Lookup(_)));
}

#[tokio::test]
async fn test_rail_uses_named_stations() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let resolved = resolver.resolve(&trip("Mumbai,Pune,rail")).await.unwrap();
    let leg = &resolved.legs[0];
    assert_eq!(leg.origin.name, "Mumbai CSMT");
    assert_eq!(leg.destination.name, "Pune Junction");
    assert_eq!(leg.distance_km, 192.0);
    assert_eq!(leg.vehicle, Vehicle::ElectricTrain);
    assert!((leg.emission_kg - 192.0 * 0.82).abs() < 1e-9);
}

#[tokio::test]
async fn test_rail_falls_back_to_nearest_station_and_flags_short_distance() {
    let (maps, offline) = (maps(), offline());
    let settings = ResolverSettings {
        short_rail_threshold_km: 50.0,
        ..ResolverSettings::default()
    };
    let resolver = DistanceResolver::new(&maps, &offline, settings);

    // Thane has no named-station answer, only a nearby station
    let resolved = resolver.resolve(&trip("Mumbai,Thane,rail")).await.unwrap();
    let leg = &resolved.legs[0];
    assert_eq!(leg.destination.name, "Thane Station");
    assert_eq!(leg.distance_km, 34.0);

    // flagged, not rejected
    assert_eq!(
        resolved.warnings,
        vec![ResolutionWarning::ShortRailDistance {
            distance_km: 34.0,
            threshold_km: 50.0
        }]
    );
}

#[tokio::test]
async fn test_rail_without_route_uses_straight_line_between_stations() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    // No rail route is listed between Pune Junction and Thane Station
    let resolved = resolver.resolve(&trip("Pune,Thane,rail")).await.unwrap();
    let leg = &resolved.legs[0];
    assert_eq!(leg.origin.name, "Pune Junction");
    assert_eq!(leg.destination.name, "Thane Station");
    assert_eq!(leg.source, DistanceSource::Geodesic);
    assert_eq!(leg.distance_km, geodesic_km(&leg.origin, &leg.destination));
    assert_eq!(
        resolved.warnings,
        vec![ResolutionWarning::GeodesicFallback {
            from: "Pune Junction".to_string(),
            to: "Thane Station".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_air_total_is_sum_of_three_legs() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let resolved = resolver.resolve(&trip("Mumbai,Delhi,air")).await.unwrap();
    assert_eq!(resolved.legs.len(), 3);

    let to_hub = resolved.legs[0].distance_km;
    let hub_to_hub = resolved.legs[1].distance_km;
    let from_hub = resolved.legs[2].distance_km;
    assert_eq!(to_hub, 21.5);
    assert_eq!(from_hub, 16.2);
    assert_eq!(resolved.total_distance_km(), to_hub + hub_to_hub + from_hub);

    assert_eq!(resolved.legs[0].vehicle, Vehicle::PetrolCar);
    assert_eq!(resolved.legs[1].vehicle, Vehicle::DomesticFlight);
    assert_eq!(resolved.legs[1].source, DistanceSource::OfflineRouteTable);
    assert_eq!(resolved.direct_route_known, Some(true));

    let expected_emission = EmissionFactors::emission_kg(Vehicle::PetrolCar, to_hub)
        + EmissionFactors::emission_kg(Vehicle::DomesticFlight, hub_to_hub)
        + EmissionFactors::emission_kg(Vehicle::PetrolCar, from_hub);
    assert!((resolved.total_emission_kg() - expected_emission).abs() < 1e-9);
}

#[tokio::test]
async fn test_air_hub_distance_matches_offline_geodesic_both_ways() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    let there = resolver.resolve(&trip("Mumbai,Delhi,air")).await.unwrap();
    let back = resolver.resolve(&trip("Delhi,Mumbai,air")).await.unwrap();

    let bom = offline.airport_for_city("Mumbai").unwrap();
    let del = offline.airport_for_city("Delhi").unwrap();
    let expected = geodesic_km(&bom.place, &del.place);

    assert_eq!(there.legs[1].distance_km, expected);
    assert!((back.legs[1].distance_km - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_air_falls_back_to_hub_geodesic_and_flags_bad_distance_text() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    // The offline table lists Bengaluru as "Bangalore"; the airport drive
    // comes back as unreadable text
    let resolved = resolver
        .resolve(&trip("Bengaluru,Delhi,air"))
        .await
        .unwrap();

    let hub_leg = &resolved.legs[1];
    assert_eq!(hub_leg.source, DistanceSource::Geodesic);
    assert_eq!(
        hub_leg.distance_km,
        geodesic_km(&hub_leg.origin, &hub_leg.destination)
    );

    let access = &resolved.legs[0];
    assert_eq!(access.source, DistanceSource::Geodesic);
    assert!(access.distance_km > 0.0);
    assert!(resolved.warnings.contains(&ResolutionWarning::UnparseableDistance {
        from: "Bengaluru".to_string(),
        to: "Kempegowda International Airport".to_string(),
        text: "unknown".to_string(),
    }));
    assert!(
        resolved
            .warnings
            .iter()
            .any(|w| matches!(w, ResolutionWarning::GeodesicFallback { .. }))
    );
}

#[tokio::test]
async fn test_air_falls_back_to_typed_city_names() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());

    // The Hyderabad airport hub is listed under Shamshabad, which the
    // offline table does not know
    assert!(offline.airport_for_city("Shamshabad").is_none());
    let resolved = resolver
        .resolve(&trip("Hyderabad,Delhi,air"))
        .await
        .unwrap();

    let hub_leg = &resolved.legs[1];
    assert_eq!(hub_leg.origin.name, "Rajiv Gandhi International Airport");
    assert_eq!(hub_leg.source, DistanceSource::OfflineRouteTable);
    assert_eq!(
        Some(hub_leg.distance_km),
        offline.air_distance_by_city("Hyderabad", "Delhi")
    );
    assert_eq!(resolved.legs[0].distance_km, 31.4);
    assert_eq!(resolved.direct_route_known, Some(false));
    assert!(resolved.warnings.is_empty());
}

#[tokio::test]
async fn test_calculator_skips_failing_entries_and_sums_the_rest() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());
    let calculator = TripCalculator::new(resolver);

    let trips: TripList = [
        "Mumbai,Pune,road",
        "Atlantis,Pune,road",
        "Paris,Mumbai,rail",
        "Mumbai,Pune,rail,diesel",
    ]
    .into_iter()
    .map(trip)
    .collect();

    let report = calculator.calculate(&trips).await;
    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.skipped_count(), 2);

    assert!(matches!(
        &report.entries[1],
        EntryOutcome::Skipped { message, .. } if message == "Distance data not available."
    ));
    assert!(matches!(
        &report.entries[2],
        EntryOutcome::Skipped { message, .. } if message.contains("within India")
    ));

    assert_eq!(report.total_distance_km, 148.0 + 192.0);
    let expected = 148.0 * 0.187 + 192.0 * 1.05;
    assert!((report.total_emission_kg - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_calculation_is_deterministic() {
    let (maps, offline) = (maps(), offline());
    let resolver = DistanceResolver::new(&maps, &offline, ResolverSettings::default());
    let calculator = TripCalculator::new(resolver);

    let mut trips = TripList::new();
    trips.add(trip("Mumbai,Delhi,air"));
    trips.add(trip("Bengaluru,Delhi,air,international"));
    trips.add(trip("Mumbai,Thane,rail"));
    trips.add(trip("Mumbai,Pune,road,electric"));

    let first = calculator.calculate(&trips).await;
    let second = calculator.calculate(&trips).await;

    assert_eq!(first.entries, second.entries);
    assert_eq!(first.total_distance_km, second.total_distance_km);
    assert_eq!(first.total_emission_kg, second.total_emission_kg);
    assert_eq!(first.skipped_count(), 0);
}
