//! Segment construction
//!
//! Decomposes an itinerary into directed travel legs between consecutive
//! waypoints: Origin → Stop[0] → … → Stop[last] → Destination. Pieces that
//! are absent (no stops, no destination) simply shorten the chain; with no
//! stops and a destination the single segment is Origin → Destination.

use uuid::Uuid;

use crate::types::{Coordinates, Itinerary, Waypoint};

/// Reference to a waypoint inside one itinerary, used to address the
/// departure-side entity a segment's metrics are written onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointRef {
    Origin,
    Stop(Uuid),
    Destination,
}

/// A directed travel leg between two consecutive waypoints.
#[derive(Debug, Clone)]
pub struct Segment {
    pub from: WaypointRef,
    pub to: WaypointRef,
    pub from_location: Coordinates,
    pub to_location: Coordinates,
    /// Always taken from the departure-side entity.
    pub avoid_tolls: bool,
}

/// Per-run cache key for a segment.
///
/// Keyed on the endpoint coordinates (bit-exact) plus toll preference, not
/// on entity identity: two logical legs over the same physical segment must
/// coalesce into one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    from: (u64, u64),
    to: (u64, u64),
    avoid_tolls: bool,
}

impl Segment {
    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            from: (self.from_location.lat.to_bits(), self.from_location.lng.to_bits()),
            to: (self.to_location.lat.to_bits(), self.to_location.lng.to_bits()),
            avoid_tolls: self.avoid_tolls,
        }
    }
}

/// Build the ordered segment list for an itinerary.
///
/// Returns an empty list when there is no origin, or nothing to travel to.
pub fn build_segments(itinerary: &Itinerary) -> Vec<Segment> {
    let origin = match &itinerary.origin {
        Some(origin) => origin,
        None => return vec![],
    };

    // Departure-side endpoints in travel order.
    let mut segments = Vec::with_capacity(itinerary.stops.len() + 1);
    let mut prev: (WaypointRef, Coordinates, bool) =
        (WaypointRef::Origin, origin.location(), origin.avoid_tolls);

    for stop in &itinerary.stops {
        segments.push(Segment {
            from: prev.0,
            to: WaypointRef::Stop(stop.id),
            from_location: prev.1,
            to_location: stop.location(),
            avoid_tolls: prev.2,
        });
        prev = (WaypointRef::Stop(stop.id), stop.location(), stop.avoid_tolls);
    }

    if let Some(destination) = &itinerary.destination {
        segments.push(Segment {
            from: prev.0,
            to: WaypointRef::Destination,
            from_location: prev.1,
            to_location: destination.location(),
            avoid_tolls: prev.2,
        });
    }

    segments
}
