//! Wayplan itinerary recalculation engine
//!
//! Plans a multi-stop itinerary: an origin, an ordered sequence of stops
//! and a destination. For each consecutive pair the engine resolves travel
//! duration, distance and an encoded path through a routing provider
//! (memoized per run), then propagates wall-clock arrival/departure times
//! forward from the departure instant through travel and dwell durations.
//! Both phases run under one all-or-nothing recalculation, route strictly
//! before schedule.
//!
//! This is a library with no CLI or wire surface; it is driven by the
//! surrounding request-handling code.

pub mod config;
pub mod services;
pub mod types;

pub use config::Config;
pub use services::aggregate::{format_duration, summarize, ItinerarySummary};
pub use services::recalculation::{Phases, RecalculationEngine, RecalculationError};
pub use services::route_resolver::RouteResolver;
pub use services::routing::{
    create_provider_with_fallback, LegRoute, MockRoutingProvider, RoutingProvider, ValhallaClient,
    ValhallaConfig,
};
pub use services::schedule::project_schedule;
pub use services::segments::{build_segments, Segment, SegmentKey, WaypointRef};
pub use types::{
    Coordinates, Destination, Itinerary, ItineraryError, Origin, OutboundLeg, Stop, Waypoint,
};
