//! Geocoding provider implementations.

mod google;
mod here;
mod locationiq;
mod mapbox;
mod nominatim;
mod opencage;

pub use google::GoogleProvider;
pub use here::HereProvider;
pub use locationiq::LocationIqProvider;
pub use mapbox::MapboxProvider;
pub use nominatim::NominatimProvider;
pub use opencage::OpenCageProvider;

use crate::error::{GeocodeError, Result};
use crate::provider::GeocodeProvider;
use aeroscout_core::GeocodeConfig;
use std::sync::Arc;
use std::time::Duration;

/// Build the ordered provider list from configuration.
///
/// Providers whose credentials are absent are skipped with a warning, so a
/// keyless setup still resolves through Nominatim. Unknown names in the
/// configured order are an error: a typo should not silently shorten the
/// failover chain.
///
/// # Errors
/// Returns error if the order names an unknown provider or no provider can
/// be constructed.
pub fn build_providers(config: &GeocodeConfig) -> Result<Vec<Arc<dyn GeocodeProvider>>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut providers: Vec<Arc<dyn GeocodeProvider>> = Vec::new();

    for name in &config.provider_order {
        match name.trim().to_lowercase().as_str() {
            "nominatim" => {
                providers.push(Arc::new(NominatimProvider::new(
                    &config.nominatim_url,
                    &config.user_agent,
                    timeout,
                )?));
            }
            "locationiq" => match &config.locationiq_key {
                Some(key) => {
                    providers.push(Arc::new(LocationIqProvider::new(key, timeout)?));
                }
                None => tracing::warn!(provider = "locationiq", "skipping provider: no API key"),
            },
            "opencage" => match &config.opencage_key {
                Some(key) => {
                    providers.push(Arc::new(OpenCageProvider::new(key, timeout)?));
                }
                None => tracing::warn!(provider = "opencage", "skipping provider: no API key"),
            },
            "here" => match &config.here_api_key {
                Some(key) => {
                    providers.push(Arc::new(HereProvider::new(key, timeout)?));
                }
                None => tracing::warn!(provider = "here", "skipping provider: no API key"),
            },
            "mapbox" => match &config.mapbox_token {
                Some(token) => {
                    providers.push(Arc::new(MapboxProvider::new(token, timeout)?));
                }
                None => {
                    tracing::warn!(provider = "mapbox", "skipping provider: no access token");
                }
            },
            "google" => match &config.google_api_key {
                Some(key) => {
                    providers.push(Arc::new(GoogleProvider::new(key, timeout)?));
                }
                None => tracing::warn!(provider = "google", "skipping provider: no API key"),
            },
            other => {
                return Err(GeocodeError::UnknownProvider {
                    name: other.to_string(),
                });
            }
        }
    }

    if providers.is_empty() {
        return Err(GeocodeError::MissingCredentials {
            provider: "all configured providers".to_string(),
        });
    }

    Ok(providers)
}

/// Build a reqwest client with the given per-request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GeocodeError::Internal(format!("failed to create HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_providers_keyless_config_keeps_nominatim_only() {
        let config = GeocodeConfig::default();
        let providers = build_providers(&config).expect("build providers");

        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].provider_id(), "nominatim");
    }

    #[test]
    fn test_build_providers_preserves_configured_order() {
        let mut config = GeocodeConfig::default();
        config.provider_order = vec!["mapbox".to_string(), "nominatim".to_string()];
        config.mapbox_token = Some("token".to_string());

        let providers = build_providers(&config).expect("build providers");
        let ids: Vec<_> = providers.iter().map(|p| p.provider_id()).collect();
        assert_eq!(ids, vec!["mapbox", "nominatim"]);
    }

    #[test]
    fn test_build_providers_unknown_name_is_error() {
        let mut config = GeocodeConfig::default();
        config.provider_order = vec!["nominatim".to_string(), "osrm".to_string()];

        let result = build_providers(&config);
        assert!(matches!(
            result,
            Err(GeocodeError::UnknownProvider { name }) if name == "osrm"
        ));
    }

    #[test]
    fn test_build_providers_all_skipped_is_error() {
        let mut config = GeocodeConfig::default();
        config.provider_order = vec!["google".to_string(), "mapbox".to_string()];

        let result = build_providers(&config);
        assert!(matches!(
            result,
            Err(GeocodeError::MissingCredentials { .. })
        ));
    }
}
