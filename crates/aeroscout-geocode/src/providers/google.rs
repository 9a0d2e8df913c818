//! Google Geocoding API provider.
//!
//! Google reports failures inside a 200 body via the `status` field, so the
//! adapter classifies that separately from HTTP errors.

use crate::error::{GeocodeError, Result};
use crate::provider::{GeocodeProvider, GeocodeResult};
use crate::providers::http_client;
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google geocoding provider.
pub struct GoogleProvider {
    client: Client,
    key: String,
}

impl GoogleProvider {
    /// Create a new Google provider with the given API key.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            key: key.into(),
        })
    }

    fn to_result(&self, entry: &GoogleEntry) -> Result<GeocodeResult> {
        let coordinate = Coordinate::new(entry.geometry.location.lat, entry.geometry.location.lng)
            .map_err(|e| GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            })?;

        Ok(GeocodeResult {
            coordinate,
            provider: self.provider_id().to_string(),
            confidence: confidence_for(entry.geometry.location_type.as_deref()),
        })
    }
}

/// Google has no numeric score; derive one from the match precision.
fn confidence_for(location_type: Option<&str>) -> f64 {
    match location_type {
        Some("ROOFTOP") => 0.95,
        Some("RANGE_INTERPOLATED") => 0.8,
        Some("GEOMETRIC_CENTER") => 0.7,
        _ => 0.6,
    }
}

#[async_trait]
impl GeocodeProvider for GoogleProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[("address", address), ("key", self.key.as_str())])
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

        let body: GoogleResponse = response.json().await.map_err(|e| GeocodeError::Parse {
            provider: self.provider_id().to_string(),
            message: e.to_string(),
        })?;

        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                return Err(GeocodeError::EmptyResult {
                    provider: self.provider_id().to_string(),
                });
            }
            other => {
                return Err(GeocodeError::Provider {
                    provider: self.provider_id().to_string(),
                    message: format!("status {other}"),
                });
            }
        }

        let entry = body
            .results
            .first()
            .ok_or_else(|| GeocodeError::EmptyResult {
                provider: self.provider_id().to_string(),
            })?;

        self.to_result(entry)
    }

    fn provider_id(&self) -> &'static str {
        "google"
    }
}

// Google API types

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleEntry>,
}

#[derive(Debug, Deserialize)]
struct GoogleEntry {
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLocation,
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleLocation {
    lat: f64,
    lng: f64,
}
