//! Text and JSON rendering of calculation results

use std::fmt::Write;

use crate::calculator::{CalculationReport, EntryOutcome};
use crate::emissions::EmissionFactors;
use crate::models::TransportMode;

/// Human-readable report, figures shown with two decimals
#[must_use]
pub fn render_text(report: &CalculationReport) -> String {
    let mut out = String::new();

    for (index, entry) in report.entries.iter().enumerate() {
        let request = entry.request();
        let _ = writeln!(
            out,
            "#{} {} → {} by {} ({})",
            index + 1,
            request.origin,
            request.destination,
            request.mode,
            request.vehicle
        );

        match entry {
            EntryOutcome::Resolved(trip) => {
                for leg in &trip.legs {
                    let _ = writeln!(
                        out,
                        "    {} → {}: {:.2} km via {} [{}], {:.2} kg CO2",
                        leg.origin.name,
                        leg.destination.name,
                        leg.distance_km,
                        leg.source,
                        leg.vehicle,
                        leg.emission_kg
                    );
                }
                let _ = writeln!(
                    out,
                    "    Total: {:.2} km, {:.2} kg CO2",
                    trip.total_distance_km(),
                    trip.total_emission_kg()
                );
                if trip.request.mode == TransportMode::Air {
                    match trip.direct_route_known {
                        Some(true) => out.push_str("    Direct flight listed in route table\n"),
                        Some(false) => out.push_str("    No direct flight listed in route table\n"),
                        None => {}
                    }
                }
                for warning in &trip.warnings {
                    let _ = writeln!(out, "    Warning: {warning}");
                }
            }
            EntryOutcome::Skipped { message, .. } => {
                let _ = writeln!(out, "    Skipped: {message}");
            }
        }
    }

    let _ = writeln!(
        out,
        "Overall: {:.2} km, {:.2} kg CO2 ({} of {} entries skipped)",
        report.total_distance_km,
        report.total_emission_kg,
        report.skipped_count(),
        report.entries.len()
    );
    out
}

/// Pretty-printed JSON report
pub fn render_json(report: &CalculationReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Emission factor table
#[must_use]
pub fn render_factors() -> String {
    let mut out = String::from("Mode  Vehicle               kg CO2/km\n");
    for (vehicle, factor) in EmissionFactors::table() {
        let _ = writeln!(
            out,
            "{:<5} {:<21} {factor:.3}",
            vehicle.mode().to_string(),
            vehicle.to_string()
        );
    }
    out
}
