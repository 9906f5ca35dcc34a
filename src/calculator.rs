//! Trip list processing
//!
//! Resolves every entry of a [`TripList`] in order. A failing entry is
//! skipped with a user-visible message and does not count towards the
//! totals; the rest of the list is still processed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{TripList, TripRequest};
use crate::resolver::{DistanceResolver, ResolvedTrip};

/// What happened to one trip entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Resolved(ResolvedTrip),
    Skipped {
        request: TripRequest,
        message: String,
    },
}

impl EntryOutcome {
    #[must_use]
    pub fn request(&self) -> &TripRequest {
        match self {
            EntryOutcome::Resolved(trip) => &trip.request,
            EntryOutcome::Skipped { request, .. } => request,
        }
    }

    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedTrip> {
        match self {
            EntryOutcome::Resolved(trip) => Some(trip),
            EntryOutcome::Skipped { .. } => None,
        }
    }
}

/// Result of processing a whole trip list
#[derive(Debug, Clone, Serialize)]
pub struct CalculationReport {
    pub entries: Vec<EntryOutcome>,
    pub total_distance_km: f64,
    pub total_emission_kg: f64,
    pub calculated_at: DateTime<Utc>,
}

impl CalculationReport {
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.resolved().is_none())
            .count()
    }
}

/// Runs the resolver over trip lists
pub struct TripCalculator<'a> {
    resolver: DistanceResolver<'a>,
}

impl<'a> TripCalculator<'a> {
    pub fn new(resolver: DistanceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Resolve all trips sequentially and sum distance and emissions over
    /// the entries that resolved
    pub async fn calculate(&self, trips: &TripList) -> CalculationReport {
        info!("Calculating {} trip entries", trips.len());

        let mut entries = Vec::with_capacity(trips.len());
        for request in trips {
            let outcome = match self.resolver.resolve(request).await {
                Ok(trip) => EntryOutcome::Resolved(trip),
                Err(e) => {
                    warn!(
                        "Skipping {} → {} ({}): {}",
                        request.origin, request.destination, request.mode, e
                    );
                    EntryOutcome::Skipped {
                        request: request.clone(),
                        message: e.user_message(),
                    }
                }
            };
            entries.push(outcome);
        }

        let resolved = || entries.iter().filter_map(EntryOutcome::resolved);
        let total_distance_km = resolved().map(ResolvedTrip::total_distance_km).sum();
        let total_emission_kg = resolved().map(ResolvedTrip::total_emission_kg).sum();

        CalculationReport {
            entries,
            total_distance_km,
            total_emission_kg,
            calculated_at: Utc::now(),
        }
    }
}
