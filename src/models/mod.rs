//! Data models for the TripCarbon library
//!
//! This module contains the core domain models organized by concern:
//! - Place: Geographic coordinates, country and transport hubs
//! - Trip: Requests, resolved legs and the request-scoped trip list

pub mod place;
pub mod trip;

// Re-export all public types for convenient access
pub use place::{Hub, HubKind, Place};
pub use trip::{DistanceSource, TransportMode, TripLeg, TripList, TripRequest, Vehicle};
