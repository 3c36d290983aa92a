//! Route resolution
//!
//! Resolves every travel segment of an itinerary through the routing
//! provider and writes the resulting metrics onto the departure-side
//! waypoint. Provider calls are memoized per invocation, so two legs over
//! the same physical segment cost one call. A provider failure degrades
//! that segment to zero metrics instead of failing the run.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::recalculation::RecalculationError;
use super::routing::RoutingProvider;
use super::segments::{build_segments, Segment, SegmentKey, WaypointRef};
use crate::types::{Itinerary, OutboundLeg};

/// Resolves segment travel metrics for one recalculation run.
pub struct RouteResolver<'a> {
    provider: &'a dyn RoutingProvider,
}

impl<'a> RouteResolver<'a> {
    pub fn new(provider: &'a dyn RoutingProvider) -> Self {
        Self { provider }
    }

    /// Resolve every segment of the itinerary.
    ///
    /// Fails without touching anything when there is no origin; otherwise a
    /// provider failure on a segment degrades only that segment.
    pub async fn resolve_all(&self, itinerary: &mut Itinerary) -> Result<(), RecalculationError> {
        if itinerary.origin.is_none() {
            return Err(RecalculationError::MissingOrigin);
        }
        let segments = build_segments(itinerary);
        self.resolve_into(itinerary, &segments).await
    }

    /// Resolve only the given segments (e.g. the boundary legs after a
    /// reorder). An empty list is trivially Ok with zero provider calls.
    pub async fn resolve_segments(
        &self,
        itinerary: &mut Itinerary,
        segments: &[Segment],
    ) -> Result<(), RecalculationError> {
        self.resolve_into(itinerary, segments).await
    }

    async fn resolve_into(
        &self,
        itinerary: &mut Itinerary,
        segments: &[Segment],
    ) -> Result<(), RecalculationError> {
        // Scoped to this invocation only: dedupes provider calls for legs
        // over the same coordinates and toll preference.
        let mut cache: HashMap<SegmentKey, OutboundLeg> = HashMap::new();

        for segment in segments {
            let key = segment.key();
            let leg = match cache.get(&key) {
                Some(cached) => {
                    debug!("Segment cache hit for {:?} -> {:?}", segment.from, segment.to);
                    cached.clone()
                }
                None => {
                    let leg = self.fetch_leg(segment).await;
                    cache.insert(key, leg.clone());
                    leg
                }
            };
            write_outbound(itinerary, segment.from, leg)?;
        }

        Ok(())
    }

    async fn fetch_leg(&self, segment: &Segment) -> OutboundLeg {
        let fetched = self
            .provider
            .fetch_leg(segment.from_location, segment.to_location, segment.avoid_tolls)
            .await;

        match fetched {
            Ok(route) => OutboundLeg {
                // Round up to whole minutes — a 61s leg takes 2 minutes of schedule.
                travel_time_minutes: (route.travel_time_seconds as f64 / 60.0).ceil() as i32,
                travel_distance_km: round_km(route.travel_distance_meters),
                encoded_path: route.encoded_shape,
            },
            Err(e) => {
                warn!(
                    "Routing provider {} failed for {:?} -> {:?}: {} — using zero-metrics fallback",
                    self.provider.name(),
                    segment.from,
                    segment.to,
                    e
                );
                OutboundLeg::fallback()
            }
        }
    }
}

/// Meters to kilometers with one decimal.
fn round_km(meters: u64) -> f64 {
    (meters as f64 / 1000.0 * 10.0).round() / 10.0
}

/// Write resolved metrics onto the segment's departure-side waypoint.
fn write_outbound(
    itinerary: &mut Itinerary,
    target: WaypointRef,
    leg: OutboundLeg,
) -> Result<(), RecalculationError> {
    match target {
        WaypointRef::Origin => {
            itinerary
                .origin
                .as_mut()
                .ok_or(RecalculationError::MissingOrigin)?
                .outbound = Some(leg);
        }
        WaypointRef::Stop(id) => {
            itinerary
                .stop_mut(id)
                .ok_or(RecalculationError::UnknownWaypoint(id))?
                .outbound = Some(leg);
        }
        // The destination never stores outgoing segment data.
        WaypointRef::Destination => return Err(RecalculationError::InvalidSegment),
    }
    Ok(())
}
