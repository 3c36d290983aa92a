//! Configuration management

use anyhow::Result;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Valhalla routing engine URL (optional, falls back to mock if unavailable)
    pub valhalla_url: Option<String>,

    /// Timeout for a single routing provider call, in seconds
    pub routing_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let valhalla_url = std::env::var("VALHALLA_URL").ok();

        let routing_timeout_seconds = std::env::var("ROUTING_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            valhalla_url,
            routing_timeout_seconds,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            valhalla_url: None,
            routing_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_valhalla_url_none_when_not_set() {
        std::env::remove_var("VALHALLA_URL");

        let config = Config::from_env().unwrap();
        assert!(config.valhalla_url.is_none());
    }

    #[test]
    fn test_config_valhalla_url_some_when_set() {
        std::env::set_var("VALHALLA_URL", "http://localhost:8002");

        let config = Config::from_env().unwrap();
        assert_eq!(config.valhalla_url, Some("http://localhost:8002".to_string()));

        // Cleanup
        std::env::remove_var("VALHALLA_URL");
    }

    #[test]
    fn test_config_default_timeout() {
        let config = Config::default();
        assert_eq!(config.routing_timeout_seconds, 30);
    }
}
