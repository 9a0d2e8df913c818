//! LocationIQ geocoding provider.
//!
//! LocationIQ serves a Nominatim-shaped payload from its own infrastructure,
//! so parsing mirrors the Nominatim adapter while authentication differs.

use crate::error::{GeocodeError, Result};
use crate::provider::{GeocodeProvider, GeocodeResult};
use crate::providers::http_client;
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://us1.locationiq.com/v1/search";

/// Confidence reported when the importance score is absent.
const DEFAULT_CONFIDENCE: f64 = 0.6;

/// LocationIQ geocoding provider.
pub struct LocationIqProvider {
    client: Client,
    key: String,
}

impl LocationIqProvider {
    /// Create a new LocationIQ provider with the given key.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            key: key.into(),
        })
    }

    fn to_result(&self, place: &LocationIqPlace) -> Result<GeocodeResult> {
        let parse = |value: &str| -> Result<f64> {
            value.parse().map_err(|_| GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: format!("non-numeric coordinate field: '{value}'"),
            })
        };

        let coordinate =
            Coordinate::new(parse(&place.lat)?, parse(&place.lon)?).map_err(|e| {
                GeocodeError::Parse {
                    provider: self.provider_id().to_string(),
                    message: e.to_string(),
                }
            })?;

        Ok(GeocodeResult {
            coordinate,
            provider: self.provider_id().to_string(),
            confidence: place
                .importance
                .unwrap_or(DEFAULT_CONFIDENCE)
                .clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl GeocodeProvider for LocationIqProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("q", address),
                ("key", self.key.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GeocodeError::ApiError {
                provider: self.provider_id().to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let places: Vec<LocationIqPlace> =
            response.json().await.map_err(|e| GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            })?;

        let place = places.first().ok_or_else(|| GeocodeError::EmptyResult {
            provider: self.provider_id().to_string(),
        })?;

        self.to_result(place)
    }

    fn provider_id(&self) -> &'static str {
        "locationiq"
    }
}

// LocationIQ API types (Nominatim-shaped)

#[derive(Debug, Deserialize)]
struct LocationIqPlace {
    lat: String,
    lon: String,
    importance: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LocationIqProvider {
        LocationIqProvider::new("test-key", Duration::from_secs(10)).expect("create provider")
    }

    #[test]
    fn test_parse_response() {
        let body = r#"[{"lat": "51.5088", "lon": "-2.5782", "importance": 0.65}]"#;
        let places: Vec<LocationIqPlace> = serde_json::from_str(body).expect("parse body");

        let result = provider().to_result(&places[0]).expect("convert");
        assert!((result.coordinate.lat() - 51.5088).abs() < 1e-9);
        assert!((result.confidence - 0.65).abs() < 1e-9);
        assert_eq!(result.provider, "locationiq");
    }

    #[test]
    fn test_bad_coordinate_is_parse_error() {
        let body = r#"[{"lat": "51.5088", "lon": "east"}]"#;
        let places: Vec<LocationIqPlace> = serde_json::from_str(body).expect("parse body");

        assert!(matches!(
            provider().to_result(&places[0]),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
