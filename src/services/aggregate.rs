//! Read-only itinerary rollups
//!
//! Derived on demand from the current waypoint state, never persisted.
//! Absent legs count as zero.

use serde::{Deserialize, Serialize};

use crate::types::Itinerary;

/// Totals over every departure-side leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySummary {
    pub total_distance_km: f64,
    pub total_travel_minutes: i32,
    /// Travel time as "2h 5min" / "45min".
    pub total_travel_formatted: String,
}

/// Sum distance and travel time across the itinerary's legs.
pub fn summarize(itinerary: &Itinerary) -> ItinerarySummary {
    let mut total_distance_km = 0.0;
    let mut total_travel_minutes = 0;

    if let Some(origin) = &itinerary.origin {
        if let Some(leg) = &origin.outbound {
            total_distance_km += leg.travel_distance_km;
            total_travel_minutes += leg.travel_time_minutes;
        }
    }
    for stop in &itinerary.stops {
        if let Some(leg) = &stop.outbound {
            total_distance_km += leg.travel_distance_km;
            total_travel_minutes += leg.travel_time_minutes;
        }
    }

    ItinerarySummary {
        total_distance_km,
        total_travel_minutes,
        total_travel_formatted: format_duration(total_travel_minutes),
    }
}

/// Render minutes as hours/minutes.
pub fn format_duration(minutes: i32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}min", hours, mins)
    } else {
        format!("{}min", mins)
    }
}
