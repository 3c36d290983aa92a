//! Business logic services

pub mod aggregate;
pub mod geo;
pub mod recalculation;
pub mod route_resolver;
pub mod routing;
pub mod schedule;
pub mod segments;
