//! Schedule projection
//!
//! Walks the itinerary from the origin's departure instant and computes
//! arrival/departure times for every stop plus the destination arrival,
//! from the travel metrics already stored on the departure-side waypoints.
//! Pure time arithmetic — no provider calls. Times are time-of-day only and
//! wrap across midnight: a destination may show an earlier clock time than
//! the departure.

use chrono::{NaiveTime, Timelike};

use super::recalculation::RecalculationError;
use crate::types::Itinerary;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Project arrival/departure times across the itinerary.
///
/// Deliberate no-op (and success) when the origin or its departure instant
/// is missing — scheduling simply isn't possible yet, and a preceding route
/// phase must not be rolled back over it.
///
/// Correctness depends on fresh travel metrics; calling this directly after
/// structural edits without a route phase is the caller's risk. Go through
/// [`RecalculationEngine::recalculate`](super::recalculation::RecalculationEngine::recalculate)
/// to get the ordering enforced.
pub fn project_schedule(itinerary: &mut Itinerary) -> Result<(), RecalculationError> {
    let (departure, origin_travel) = match &itinerary.origin {
        Some(origin) => match origin.departure_time {
            Some(t) => (t, origin.travel_minutes_to_next()),
            None => return Ok(()),
        },
        None => return Ok(()),
    };

    let mut current = minutes_from_midnight(departure);
    let mut travel_from_prev = origin_travel;

    for stop in &mut itinerary.stops {
        current += travel_from_prev as i64;
        stop.arrival_time = Some(to_clock(current));

        current += stop.dwell_or_default() as i64;
        stop.departure_time = Some(to_clock(current));

        travel_from_prev = stop.travel_minutes_to_next();
    }

    if let Some(destination) = &mut itinerary.destination {
        current += travel_from_prev as i64;
        destination.arrival_time = Some(to_clock(current));
    }

    Ok(())
}

fn minutes_from_midnight(t: NaiveTime) -> i64 {
    (t.num_seconds_from_midnight() / 60) as i64
}

/// Minutes to time-of-day, modulo 24 hours. No date is tracked.
fn to_clock(minutes: i64) -> NaiveTime {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY) as u32;
    NaiveTime::from_hms_opt(wrapped / 60, wrapped % 60, 0).expect("minutes wrapped into range")
}
