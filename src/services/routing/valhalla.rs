//! Valhalla routing engine client
//!
//! Valhalla API documentation:
//! https://valhalla.github.io/valhalla/api/turn-by-turn/api-reference/

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LegRoute, RoutingProvider};
use crate::types::Coordinates;

/// Valhalla client configuration
#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    /// Base URL of Valhalla server (e.g., "http://localhost:8002")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ValhallaConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Valhalla routing client
pub struct ValhallaClient {
    client: Client,
    config: ValhallaConfig,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the route request for one leg
    fn build_leg_request(
        &self,
        from: Coordinates,
        to: Coordinates,
        avoid_tolls: bool,
    ) -> RouteRequest {
        let locations = vec![
            ValhallaLocation {
                lat: from.lat,
                lon: from.lng,
                // 500m radius – tolerates geocoded coordinates that are
                // slightly off-road (building centroid vs road edge)
                radius: Some(500),
            },
            ValhallaLocation {
                lat: to.lat,
                lon: to.lng,
                radius: Some(500),
            },
        ];

        RouteRequest {
            locations,
            costing: "auto".to_string(),
            units: "kilometers".to_string(),
            directions_type: "none".to_string(), // geometry + summary only
            costing_options: avoid_tolls.then(|| CostingOptions {
                auto: AutoCostingOptions { use_tolls: Some(0.0) },
            }),
        }
    }
}

#[async_trait]
impl RoutingProvider for ValhallaClient {
    async fn fetch_leg(
        &self,
        from: Coordinates,
        to: Coordinates,
        avoid_tolls: bool,
    ) -> Result<LegRoute> {
        let request = self.build_leg_request(from, to, avoid_tolls);
        let url = format!("{}/route", self.config.base_url);

        debug!(
            "Requesting leg from Valhalla: ({}, {}) -> ({}, {}), avoid_tolls={}",
            from.lat, from.lng, to.lat, to.lng, avoid_tolls
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send route request to Valhalla")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Valhalla route returned error {}: {}", status, body);
        }

        let route_response: RouteResponse = response
            .json()
            .await
            .context("Failed to parse Valhalla route response")?;

        let trip = route_response.trip;
        // Two locations means exactly one leg; its shape is the whole path.
        let encoded_shape = trip.legs.into_iter().next().map(|leg| leg.shape);

        Ok(LegRoute {
            travel_time_seconds: trip.summary.time.round() as u64,
            // Length is in kilometers (units="kilometers")
            travel_distance_meters: (trip.summary.length * 1000.0).round() as u64,
            encoded_shape,
        })
    }

    fn name(&self) -> &str {
        "Valhalla"
    }
}

// Valhalla API types

#[derive(Debug, Serialize)]
struct RouteRequest {
    locations: Vec<ValhallaLocation>,
    costing: String,
    units: String,
    directions_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    costing_options: Option<CostingOptions>,
}

#[derive(Debug, Serialize)]
struct CostingOptions {
    auto: AutoCostingOptions,
}

#[derive(Debug, Serialize)]
struct AutoCostingOptions {
    /// 0.0 avoids toll roads entirely, 1.0 is the default preference
    #[serde(skip_serializing_if = "Option::is_none")]
    use_tolls: Option<f32>,
}

#[derive(Debug, Serialize, Clone)]
struct ValhallaLocation {
    lat: f64,
    lon: f64,
    /// Radius in meters for snapping to roads
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    trip: Trip,
}

#[derive(Debug, Deserialize)]
struct Trip {
    legs: Vec<Leg>,
    summary: TripSummary,
}

#[derive(Debug, Deserialize)]
struct TripSummary {
    /// Travel time in seconds
    time: f64,
    /// Travel distance in the requested units (kilometers)
    length: f64,
}

#[derive(Debug, Deserialize)]
struct Leg {
    /// Encoded polyline shape (precision 6)
    shape: String,
}
