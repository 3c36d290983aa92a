//! Type definitions

pub mod itinerary;
pub mod waypoint;

pub use itinerary::*;
pub use waypoint::*;
