//! Routing provider for per-segment travel metrics
//!
//! Uses Valhalla for production, mock for tests.

mod valhalla;

pub use valhalla::{ValhallaClient, ValhallaConfig};

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Coordinates;

/// Resolved travel metrics for one directed leg, in provider units.
#[derive(Debug, Clone)]
pub struct LegRoute {
    /// Travel time in seconds
    pub travel_time_seconds: u64,
    /// Travel distance in meters
    pub travel_distance_meters: u64,
    /// Encoded polyline shape of the leg (precision 6), if available
    pub encoded_shape: Option<String>,
}

/// Routing provider trait for abstraction (Valhalla, mock, etc.)
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Resolve travel time, distance and shape for one directed leg.
    async fn fetch_leg(
        &self,
        from: Coordinates,
        to: Coordinates,
        avoid_tolls: bool,
    ) -> Result<LegRoute>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Mock routing provider for tests
/// Uses Haversine distance × coefficient for estimation
pub struct MockRoutingProvider;

impl MockRoutingProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockRoutingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoutingProvider for MockRoutingProvider {
    async fn fetch_leg(
        &self,
        from: Coordinates,
        to: Coordinates,
        _avoid_tolls: bool,
    ) -> Result<LegRoute> {
        use crate::services::geo::{road_distance, travel_time_seconds};

        let distance_m = (road_distance(&from, &to) * 1000.0) as u64;
        let duration_s = travel_time_seconds(&from, &to) as u64;

        Ok(LegRoute {
            travel_time_seconds: duration_s,
            travel_distance_meters: distance_m,
            // Straight line between the endpoints stands in for real geometry.
            encoded_shape: Some(encode_polyline(&[from, to], 6)),
        })
    }

    fn name(&self) -> &str {
        "MockRouting"
    }
}

/// Encode coordinates as a polyline string.
/// Precision is 6 decimal places for Valhalla (vs 5 for Google).
pub fn encode_polyline(points: &[Coordinates], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut encoded = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in points {
        let lat = (point.lat * factor).round() as i64;
        let lng = (point.lng * factor).round() as i64;

        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);

        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn encode_value(value: i64, out: &mut String) {
    // Zigzag: sign goes into the low bit
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };
    while v >= 0x20 {
        out.push(((0x20 | (v & 0x1f)) + 63) as u8 as char);
        v >>= 5;
    }
    out.push((v + 63) as u8 as char);
}

/// Create routing provider with automatic Valhalla detection and fallback
///
/// Tries to connect to Valhalla if URL is provided. Falls back to the mock
/// provider if Valhalla is unavailable or the URL is not configured.
pub async fn create_provider_with_fallback(
    valhalla_url: Option<String>,
    timeout_seconds: u64,
) -> Box<dyn RoutingProvider> {
    use tracing::{info, warn};

    if let Some(url) = valhalla_url {
        let config = ValhallaConfig::new(&url).with_timeout(timeout_seconds);
        let client = ValhallaClient::new(config);

        match check_valhalla_health(&url).await {
            Ok(()) => {
                info!("Valhalla routing provider available at {}", url);
                return Box::new(client);
            }
            Err(e) => {
                warn!("Valhalla not available at {}: {}. Falling back to mock routing.", url, e);
            }
        }
    }

    info!("Using mock routing provider (Valhalla not configured or unavailable)");
    Box::new(MockRoutingProvider::new())
}

/// Check if Valhalla is healthy by making a simple status request
async fn check_valhalla_health(base_url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    let url = format!("{}/status", base_url);
    let response = client.get(&url).send().await?;

    if response.status().is_success() {
        Ok(())
    } else {
        anyhow::bail!("Valhalla returned status {}", response.status())
    }
}
