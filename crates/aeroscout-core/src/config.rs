//! Configuration management for aeroscout.
//!
//! TOML-based configuration loaded from an explicit path, with environment
//! variable overrides for endpoint URLs and provider API keys. Secrets are
//! never written back to disk.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// Every section falls back to defaults, so a missing file yields a working
/// configuration for the keyless providers (Nominatim, Overpass).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Geocoding resolution settings
    pub geocode: GeocodeConfig,
    /// Spatial discovery settings
    pub discovery: DiscoveryConfig,
    /// Reverse-geocode enrichment settings
    pub enrichment: EnrichmentConfig,
}

impl AppConfig {
    /// Load configuration from the given path, falling back to defaults if
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or is not valid
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `AEROSCOUT_NOMINATIM_URL`: Nominatim base URL
    /// - `AEROSCOUT_OVERPASS_URL`: Overpass API URL
    /// - `AEROSCOUT_MAPBOX_TOKEN`, `AEROSCOUT_GOOGLE_API_KEY`,
    ///   `AEROSCOUT_HERE_API_KEY`, `AEROSCOUT_LOCATIONIQ_KEY`,
    ///   `AEROSCOUT_OPENCAGE_KEY`: provider credentials
    pub fn load_with_env(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let mut config = Self::load(path)?;

        if let Ok(url) = std::env::var("AEROSCOUT_NOMINATIM_URL") {
            tracing::debug!("override nominatim_url from env");
            config.geocode.nominatim_url = url;
        }
        if let Ok(url) = std::env::var("AEROSCOUT_OVERPASS_URL") {
            tracing::debug!("override overpass_url from env");
            config.discovery.overpass_url = url;
        }

        config.geocode.mapbox_token = std::env::var("AEROSCOUT_MAPBOX_TOKEN").ok();
        config.geocode.google_api_key = std::env::var("AEROSCOUT_GOOGLE_API_KEY").ok();
        config.geocode.here_api_key = std::env::var("AEROSCOUT_HERE_API_KEY").ok();
        config.geocode.locationiq_key = std::env::var("AEROSCOUT_LOCATIONIQ_KEY").ok();
        config.geocode.opencage_key = std::env::var("AEROSCOUT_OPENCAGE_KEY").ok();

        Ok(config)
    }

    /// Validate configuration values that cannot be expressed in the type.
    fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.geocode.min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: "geocode.min_confidence".to_string(),
                reason: format!("must be in [0, 1], got {}", self.geocode.min_confidence),
            });
        }

        if self.geocode.provider_order.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "geocode.provider_order".to_string(),
                reason: "at least one provider must be configured".to_string(),
            });
        }

        if self.enrichment.max_concurrent == 0 {
            return Err(ConfigError::InvalidValue {
                field: "enrichment.max_concurrent".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.discovery.proximity_threshold_m <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "discovery.proximity_threshold_m".to_string(),
                reason: format!(
                    "must be positive, got {}",
                    self.discovery.proximity_threshold_m
                ),
            });
        }

        Ok(())
    }
}

/// Geocoding resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    /// Provider failover order, cheapest/most-reliable first
    pub provider_order: Vec<String>,
    /// Minimum confidence for a result to be accepted
    pub min_confidence: f64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Nominatim base URL
    pub nominatim_url: String,
    /// User agent sent to providers that require one
    pub user_agent: String,

    /// Mapbox access token (environment only, never persisted)
    #[serde(skip)]
    pub mapbox_token: Option<String>,
    /// Google Geocoding API key (environment only)
    #[serde(skip)]
    pub google_api_key: Option<String>,
    /// HERE API key (environment only)
    #[serde(skip)]
    pub here_api_key: Option<String>,
    /// LocationIQ key (environment only)
    #[serde(skip)]
    pub locationiq_key: Option<String>,
    /// OpenCage key (environment only)
    #[serde(skip)]
    pub opencage_key: Option<String>,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            provider_order: vec![
                "nominatim".to_string(),
                "locationiq".to_string(),
                "opencage".to_string(),
                "here".to_string(),
                "mapbox".to_string(),
                "google".to_string(),
            ],
            min_confidence: 0.3,
            timeout_secs: 10,
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "aeroscout/0.1.0 (+https://github.com/aeroscout/aeroscout)".to_string(),
            mapbox_token: None,
            google_api_key: None,
            here_api_key: None,
            locationiq_key: None,
            opencage_key: None,
        }
    }
}

/// Spatial discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Overpass API endpoint
    pub overpass_url: String,
    /// Discovery query timeout in seconds
    pub timeout_secs: u64,
    /// Path to the taxonomy (tag predicates + keywords) TOML file
    pub taxonomy_path: PathBuf,
    /// Deduplication proximity threshold in meters
    pub proximity_threshold_m: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 30,
            taxonomy_path: PathBuf::from("taxonomy/industrial.toml"),
            proximity_threshold_m: 50.0,
        }
    }
}

/// Reverse-geocode enrichment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Maximum in-flight reverse-geocode requests
    pub max_concurrent: usize,
    /// Emit a progress log line every this many completions
    pub progress_every: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            progress_every: 10,
        }
    }
}
