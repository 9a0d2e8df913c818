//! OpenCage geocoding provider.

use crate::error::{GeocodeError, Result};
use crate::provider::{GeocodeProvider, GeocodeResult};
use crate::providers::http_client;
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Confidence reported when OpenCage omits its 1-10 score.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// OpenCage geocoding provider.
pub struct OpenCageProvider {
    client: Client,
    key: String,
}

impl OpenCageProvider {
    /// Create a new OpenCage provider with the given key.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            key: key.into(),
        })
    }

    fn to_result(&self, entry: &OpenCageEntry) -> Result<GeocodeResult> {
        let coordinate = Coordinate::new(entry.geometry.lat, entry.geometry.lng).map_err(|e| {
            GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            }
        })?;

        // OpenCage scores matches from 1 (coarse) to 10 (exact).
        let confidence = entry
            .confidence
            .map_or(DEFAULT_CONFIDENCE, |c| f64::from(c) / 10.0)
            .clamp(0.0, 1.0);

        Ok(GeocodeResult {
            coordinate,
            provider: self.provider_id().to_string(),
            confidence,
        })
    }
}

#[async_trait]
impl GeocodeProvider for OpenCageProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("q", address),
                ("key", self.key.as_str()),
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

        let body: OpenCageResponse =
            response.json().await.map_err(|e| GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            })?;

        let entry = body
            .results
            .first()
            .ok_or_else(|| GeocodeError::EmptyResult {
                provider: self.provider_id().to_string(),
            })?;

        self.to_result(entry)
    }

    fn provider_id(&self) -> &'static str {
        "opencage"
    }
}

// OpenCage API types

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageEntry>,
}

#[derive(Debug, Deserialize)]
struct OpenCageEntry {
    geometry: OpenCageGeometry,
    confidence: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}
