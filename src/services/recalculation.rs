//! Recalculation orchestration
//!
//! Runs the two phases of an itinerary recalculation — route resolution,
//! then schedule projection — as one all-or-nothing unit. The route phase
//! always runs strictly before the schedule phase, because the schedule is
//! only correct on fresh travel metrics. Phases execute against a scratch
//! copy of the itinerary that is committed by assignment only when every
//! requested phase succeeded, so a failure leaves the caller's itinerary
//! exactly as it was.

use tracing::{debug, info};
use uuid::Uuid;

use super::route_resolver::RouteResolver;
use super::routing::RoutingProvider;
use super::schedule::project_schedule;
use super::segments::Segment;
use crate::types::Itinerary;

/// Failures that abort a recalculation run. Segment-level routing failures
/// are not among them — those degrade to zero metrics inside the run.
#[derive(Debug, thiserror::Error)]
pub enum RecalculationError {
    #[error("itinerary has no origin — nothing to compute")]
    MissingOrigin,
    #[error("segment references waypoint {0} which is not in the itinerary")]
    UnknownWaypoint(Uuid),
    #[error("segment departs from the destination")]
    InvalidSegment,
}

/// Which phases a recalculation run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    pub route: bool,
    pub schedule: bool,
}

impl Phases {
    /// Stop add/remove/reorder and toll-preference edits: both phases.
    pub fn full() -> Self {
        Self { route: true, schedule: true }
    }

    /// Dwell-duration-only edits: travel metrics are still fresh.
    pub fn schedule_only() -> Self {
        Self { route: false, schedule: true }
    }
}

impl Default for Phases {
    fn default() -> Self {
        Self::schedule_only()
    }
}

/// The engine behind both public recalculation entry points.
pub struct RecalculationEngine {
    provider: Box<dyn RoutingProvider>,
}

impl RecalculationEngine {
    pub fn new(provider: Box<dyn RoutingProvider>) -> Self {
        Self { provider }
    }

    /// Recalculate the itinerary, all-or-nothing.
    ///
    /// On `Ok` the itinerary holds the writes of every requested phase; on
    /// `Err` it is untouched. Requesting no phase at all is trivially `Ok`.
    pub async fn recalculate(
        &self,
        itinerary: &mut Itinerary,
        phases: Phases,
    ) -> Result<(), RecalculationError> {
        if !phases.route && !phases.schedule {
            return Ok(());
        }

        let mut scratch = itinerary.clone();

        if phases.route {
            debug!("Route phase: resolving segments via {}", self.provider.name());
            RouteResolver::new(self.provider.as_ref())
                .resolve_all(&mut scratch)
                .await?;
        }

        if phases.schedule {
            debug!("Schedule phase: projecting timestamps");
            project_schedule(&mut scratch)?;
        }

        *itinerary = scratch;
        info!(
            "Recalculated itinerary (route: {}, schedule: {}, stops: {})",
            phases.route,
            phases.schedule,
            itinerary.stops.len()
        );
        Ok(())
    }

    /// Resolve only the given segments, committing all-or-nothing.
    ///
    /// For callers that know exactly which boundary legs changed (e.g. after
    /// a reorder) and don't need a full route phase. An empty list is
    /// trivially `Ok` with zero provider calls.
    pub async fn recalculate_subset(
        &self,
        itinerary: &mut Itinerary,
        segments: &[Segment],
    ) -> Result<(), RecalculationError> {
        if segments.is_empty() {
            return Ok(());
        }

        let mut scratch = itinerary.clone();
        RouteResolver::new(self.provider.as_ref())
            .resolve_segments(&mut scratch, segments)
            .await?;

        *itinerary = scratch;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::routing::{LegRoute, MockRoutingProvider};
    use crate::services::segments::{build_segments, WaypointRef};
    use crate::types::{Coordinates, Destination, Origin, Stop};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveTime;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates { lat, lng }
    }

    /// Fixed-metrics provider: every leg is 30 minutes / 20.0 km.
    struct FixedProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RoutingProvider for FixedProvider {
        async fn fetch_leg(
            &self,
            _from: Coordinates,
            _to: Coordinates,
            _avoid_tolls: bool,
        ) -> Result<LegRoute> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LegRoute {
                travel_time_seconds: 1_800,
                travel_distance_meters: 20_000,
                encoded_shape: Some("shape".to_string()),
            })
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    fn engine_with_counter() -> (RecalculationEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = RecalculationEngine::new(Box::new(FixedProvider { calls: calls.clone() }));
        (engine, calls)
    }

    fn schedulable_itinerary() -> Itinerary {
        let mut itin = Itinerary::new();
        let mut origin = Origin::new(coords(50.0, 14.0));
        origin.departure_time = Some(hm(9, 0));
        itin.origin = Some(origin);
        let mut stop = Stop::new(coords(50.1, 14.1));
        stop.dwell_minutes = Some(60);
        itin.push_stop(stop);
        itin.destination = Some(Destination::new(coords(50.2, 14.2)));
        itin
    }

    #[tokio::test]
    async fn full_recalculation_runs_route_before_schedule() {
        let (engine, _) = engine_with_counter();
        let mut itin = schedulable_itinerary();

        engine.recalculate(&mut itin, Phases::full()).await.unwrap();

        // The schedule was projected from metrics written in this same call.
        assert_eq!(itin.stops[0].arrival_time, Some(hm(9, 30)));
        assert_eq!(itin.stops[0].departure_time, Some(hm(10, 30)));
        assert_eq!(
            itin.destination.as_ref().unwrap().arrival_time,
            Some(hm(11, 0))
        );
        assert_eq!(
            itin.origin.as_ref().unwrap().outbound.as_ref().unwrap().travel_distance_km,
            20.0
        );
    }

    #[tokio::test]
    async fn schedule_only_skips_the_provider() {
        let (engine, calls) = engine_with_counter();
        let mut itin = schedulable_itinerary();

        // Stale metrics from a previous run.
        itin.origin.as_mut().unwrap().outbound = Some(crate::types::OutboundLeg {
            travel_time_minutes: 10,
            travel_distance_km: 5.0,
            encoded_path: None,
        });

        engine
            .recalculate(&mut itin, Phases::schedule_only())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(itin.stops[0].arrival_time, Some(hm(9, 10)));
    }

    #[tokio::test]
    async fn no_phases_requested_is_trivially_ok() {
        let (engine, calls) = engine_with_counter();
        let mut itin = schedulable_itinerary();

        engine
            .recalculate(&mut itin, Phases { route: false, schedule: false })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(itin.stops[0].arrival_time.is_none());
    }

    #[tokio::test]
    async fn route_failure_aborts_without_schedule_and_without_writes() {
        let (engine, calls) = engine_with_counter();
        let mut itin = schedulable_itinerary();
        itin.origin = None;

        let err = engine.recalculate(&mut itin, Phases::full()).await.unwrap_err();

        assert!(matches!(err, RecalculationError::MissingOrigin));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // No partial state: nothing was scheduled either.
        assert!(itin.stops[0].arrival_time.is_none());
        assert!(itin.destination.as_ref().unwrap().arrival_time.is_none());
    }

    #[tokio::test]
    async fn schedule_noop_does_not_discard_route_phase_writes() {
        let (engine, _) = engine_with_counter();
        let mut itin = schedulable_itinerary();
        itin.origin.as_mut().unwrap().departure_time = None;

        engine.recalculate(&mut itin, Phases::full()).await.unwrap();

        // Route metrics committed even though scheduling wasn't possible yet.
        assert!(itin.origin.as_ref().unwrap().outbound.is_some());
        assert!(itin.stops[0].outbound.is_some());
        assert!(itin.stops[0].arrival_time.is_none());
    }

    #[tokio::test]
    async fn subset_failure_rolls_back_every_write() {
        let (engine, _) = engine_with_counter();
        let mut itin = schedulable_itinerary();

        let mut segments = build_segments(&itin);
        // First segment is fine; second now references a removed stop.
        segments[1].from = WaypointRef::Stop(uuid::Uuid::new_v4());

        let before = serde_json::to_string(&itin).unwrap();
        let err = engine.recalculate_subset(&mut itin, &segments).await.unwrap_err();

        assert!(matches!(err, RecalculationError::UnknownWaypoint(_)));
        // The successfully resolved first segment was discarded too.
        assert_eq!(serde_json::to_string(&itin).unwrap(), before);
    }

    #[tokio::test]
    async fn subset_with_empty_list_is_trivially_ok() {
        let (engine, calls) = engine_with_counter();
        let mut itin = schedulable_itinerary();

        engine.recalculate_subset(&mut itin, &[]).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn works_with_the_mock_provider_end_to_end() {
        let engine = RecalculationEngine::new(Box::new(MockRoutingProvider::new()));
        let mut itin = schedulable_itinerary();

        engine.recalculate(&mut itin, Phases::full()).await.unwrap();

        let leg = itin.origin.as_ref().unwrap().outbound.as_ref().unwrap();
        assert!(leg.travel_time_minutes > 0);
        assert!(leg.travel_distance_km > 0.0);
        assert!(leg.encoded_path.is_some());
        assert!(itin.stops[0].arrival_time.is_some());
    }
}
