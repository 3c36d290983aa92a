//! Itinerary aggregate
//!
//! Owns at most one origin, an ordered list of stops (positions 1..N,
//! contiguous and unique) and at most one destination. The recalculation
//! engine only writes travel metrics and timestamps onto these entities;
//! creating, removing and reordering stops is done here by the surrounding
//! collaborators, which then trigger a recalculation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::waypoint::{Destination, Origin, Stop};

/// Errors from itinerary structure edits.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ItineraryError {
    #[error("stop {0} is not part of this itinerary")]
    UnknownStop(Uuid),
    #[error("reorder must list every stop exactly once (expected {expected}, got {got})")]
    IncompleteOrdering { expected: usize, got: usize },
    #[error("stop {0} listed more than once in reorder")]
    DuplicateStop(Uuid),
}

/// A planning session's itinerary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub origin: Option<Origin>,
    /// Always held in position order.
    pub stops: Vec<Stop>,
    pub destination: Option<Destination>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self, id: Uuid) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    pub fn stop_mut(&mut self, id: Uuid) -> Option<&mut Stop> {
        self.stops.iter_mut().find(|s| s.id == id)
    }

    /// Append a stop at the end of the sequence, assigning the next position.
    pub fn push_stop(&mut self, mut stop: Stop) -> Uuid {
        stop.position = self.stops.len() as i32 + 1;
        let id = stop.id;
        self.stops.push(stop);
        id
    }

    /// Remove a stop and close the position gap.
    pub fn remove_stop(&mut self, id: Uuid) -> Result<Stop, ItineraryError> {
        let idx = self
            .stops
            .iter()
            .position(|s| s.id == id)
            .ok_or(ItineraryError::UnknownStop(id))?;
        let removed = self.stops.remove(idx);
        self.renumber();
        Ok(removed)
    }

    /// Reorder stops to the given id sequence, reassigning positions 1..N.
    ///
    /// Atomic: the ordering is validated in full (every current stop listed
    /// exactly once) before any position is touched.
    pub fn reorder_stops(&mut self, order: &[Uuid]) -> Result<(), ItineraryError> {
        if order.len() != self.stops.len() {
            return Err(ItineraryError::IncompleteOrdering {
                expected: self.stops.len(),
                got: order.len(),
            });
        }
        let mut seen = HashSet::with_capacity(order.len());
        for &id in order {
            if !seen.insert(id) {
                return Err(ItineraryError::DuplicateStop(id));
            }
            if self.stop(id).is_none() {
                return Err(ItineraryError::UnknownStop(id));
            }
        }

        self.stops.sort_by_key(|s| {
            order
                .iter()
                .position(|&id| id == s.id)
                .expect("validated above")
        });
        self.renumber();
        Ok(())
    }

    fn renumber(&mut self) {
        for (i, stop) in self.stops.iter_mut().enumerate() {
            stop.position = i as i32 + 1;
        }
    }
}
