// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,

    // --- Content ---
    /// Path to the content catalog (JSON)
    pub catalog_path: String,
    /// Path to the map pins (GeoJSON)
    pub map_pins_path: String,
    /// Where progression snapshots are loaded from and saved to
    pub snapshot_path: Option<String>,

    // --- Recognition service ---
    /// PlantNet API key
    pub plantnet_api_key: String,
    /// PlantNet base URL (no trailing path)
    pub plantnet_base_url: String,
    /// PlantNet flora project ("all" covers every flora)
    pub plantnet_project: String,
    /// Upper bound on a single recognition call
    pub recognition_timeout: Duration,
    /// Largest accepted image upload
    pub max_image_bytes: usize,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            catalog_path: "data/catalog.json".to_string(),
            map_pins_path: "data/map_pins.geojson".to_string(),
            snapshot_path: None,
            plantnet_api_key: "test_api_key".to_string(),
            plantnet_base_url: "http://127.0.0.1:9".to_string(),
            plantnet_project: "all".to_string(),
            recognition_timeout: Duration::from_secs(2),
            max_image_bytes: 1024 * 1024,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT", 8080)?,
            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "data/catalog.json".to_string()),
            map_pins_path: env::var("MAP_PINS_PATH")
                .unwrap_or_else(|_| "data/map_pins.geojson".to_string()),
            snapshot_path: env::var("SNAPSHOT_PATH").ok().filter(|p| !p.is_empty()),
            plantnet_api_key: env::var("PLANTNET_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("PLANTNET_API_KEY"))?,
            plantnet_base_url: env::var("PLANTNET_BASE_URL")
                .unwrap_or_else(|_| "https://my-api.plantnet.org".to_string()),
            plantnet_project: env::var("PLANTNET_PROJECT").unwrap_or_else(|_| "all".to_string()),
            recognition_timeout: recognition_timeout(parse_var(
                "RECOGNITION_TIMEOUT_SECS",
                30,
            )?)?,
            max_image_bytes: parse_var("MAX_IMAGE_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Recognition timeout; zero would fail every call immediately.
fn recognition_timeout(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid(
            "RECOGNITION_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("PLANTNET_API_KEY", "test_key");
        env::set_var("RECOGNITION_TIMEOUT_SECS", "12");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.plantnet_api_key, "test_key");
        assert_eq!(config.recognition_timeout, Duration::from_secs(12));
        assert_eq!(config.plantnet_project, "all");
        assert_eq!(config.port, 8080);

        env::remove_var("RECOGNITION_TIMEOUT_SECS");
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("TREEQUEST_TEST_BAD_NUMBER", "ten");
        let err = parse_var::<u64>("TREEQUEST_TEST_BAD_NUMBER", 1).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("TREEQUEST_TEST_BAD_NUMBER", _)));
    }

    #[test]
    fn test_zero_recognition_timeout_rejected() {
        let err = recognition_timeout(0).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("RECOGNITION_TIMEOUT_SECS", _)));
        assert_eq!(recognition_timeout(1).unwrap(), Duration::from_secs(1));
    }
}
