//! Waypoint types
//!
//! An itinerary is walked Origin → Stops (in position order) → Destination.
//! Segment metrics always live on the departure side: the leg A→B is stored
//! on A (`outbound`), never on B. The Destination is never a departure side
//! and therefore carries no outbound leg.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Travel metrics for the leg from a waypoint to its successor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundLeg {
    /// Travel time in whole minutes (rounded up from provider seconds).
    pub travel_time_minutes: i32,
    /// Travel distance in km, one decimal (rounded from provider meters).
    pub travel_distance_km: f64,
    /// Encoded polyline of the leg. `None` when resolution degraded.
    pub encoded_path: Option<String>,
}

impl OutboundLeg {
    /// Zero-metrics fallback used when the routing provider fails for a leg.
    pub fn fallback() -> Self {
        Self {
            travel_time_minutes: 0,
            travel_distance_km: 0.0,
            encoded_path: None,
        }
    }
}

/// Starting point of an itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub location: Coordinates,
    /// Departure instant (time of day). Absent means "not yet schedulable".
    pub departure_time: Option<NaiveTime>,
    pub avoid_tolls: bool,
    /// Leg to the first stop (or straight to the destination).
    pub outbound: Option<OutboundLeg>,
}

impl Origin {
    pub fn new(location: Coordinates) -> Self {
        Self {
            location,
            departure_time: None,
            avoid_tolls: false,
            outbound: None,
        }
    }

    /// Travel minutes to the next waypoint, 0 while unresolved.
    pub fn travel_minutes_to_next(&self) -> i32 {
        self.outbound.as_ref().map_or(0, |leg| leg.travel_time_minutes)
    }
}

/// An intermediate stop, ordered by `position` (1-based, contiguous).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: Uuid,
    pub position: i32,
    pub location: Coordinates,
    pub avoid_tolls: bool,
    /// Minutes spent at the stop before departing. Treated as 0 when absent.
    pub dwell_minutes: Option<i32>,
    /// Computed by the schedule phase.
    pub arrival_time: Option<NaiveTime>,
    /// Computed by the schedule phase.
    pub departure_time: Option<NaiveTime>,
    /// Leg to the next stop (or the destination).
    pub outbound: Option<OutboundLeg>,
}

impl Stop {
    pub fn new(location: Coordinates) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: 0,
            location,
            avoid_tolls: false,
            dwell_minutes: None,
            arrival_time: None,
            departure_time: None,
            outbound: None,
        }
    }

    pub fn travel_minutes_to_next(&self) -> i32 {
        self.outbound.as_ref().map_or(0, |leg| leg.travel_time_minutes)
    }

    pub fn dwell_or_default(&self) -> i32 {
        self.dwell_minutes.unwrap_or(0)
    }
}

/// Final point of an itinerary. Location only — no outgoing segment data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub location: Coordinates,
    /// Computed by the schedule phase.
    pub arrival_time: Option<NaiveTime>,
}

impl Destination {
    pub fn new(location: Coordinates) -> Self {
        Self {
            location,
            arrival_time: None,
        }
    }
}

/// Uniform read access across the three waypoint kinds, so segment
/// construction never has to branch on the concrete type.
pub trait Waypoint {
    fn location(&self) -> Coordinates;
}

impl Waypoint for Origin {
    fn location(&self) -> Coordinates {
        self.location
    }
}

impl Waypoint for Stop {
    fn location(&self) -> Coordinates {
        self.location
    }
}

impl Waypoint for Destination {
    fn location(&self) -> Coordinates {
        self.location
    }
}
