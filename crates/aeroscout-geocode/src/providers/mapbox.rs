//! Mapbox geocoding provider.

use crate::error::{GeocodeError, Result};
use crate::provider::{GeocodeProvider, GeocodeResult};
use crate::providers::http_client;
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Confidence reported when Mapbox omits the relevance score.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Mapbox geocoding provider.
pub struct MapboxProvider {
    client: Client,
    token: String,
}

impl MapboxProvider {
    /// Create a new Mapbox provider with the given access token.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            token: token.into(),
        })
    }

    /// The query lives in the URL path, so it must be percent-encoded as a
    /// path segment rather than passed as a query parameter.
    fn search_url(&self, address: &str) -> Result<Url> {
        let mut url = Url::parse(BASE_URL)
            .map_err(|e| GeocodeError::Internal(format!("invalid mapbox base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| GeocodeError::Internal("mapbox base URL cannot be a base".to_string()))?
            .push(&format!("{address}.json"));
        Ok(url)
    }

    fn to_result(&self, feature: &MapboxFeature) -> Result<GeocodeResult> {
        let [lon, lat] = feature.center;

        let coordinate = Coordinate::new(lat, lon).map_err(|e| GeocodeError::Parse {
            provider: self.provider_id().to_string(),
            message: e.to_string(),
        })?;

        Ok(GeocodeResult {
            coordinate,
            provider: self.provider_id().to_string(),
            confidence: feature
                .relevance
                .unwrap_or(DEFAULT_CONFIDENCE)
                .clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl GeocodeProvider for MapboxProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .client
            .get(self.search_url(address)?)
            .query(&[("access_token", self.token.as_str()), ("limit", "1")])
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

        let body: MapboxResponse = response.json().await.map_err(|e| GeocodeError::Parse {
            provider: self.provider_id().to_string(),
            message: e.to_string(),
        })?;

        let feature = body
            .features
            .first()
            .ok_or_else(|| GeocodeError::EmptyResult {
                provider: self.provider_id().to_string(),
            })?;

        self.to_result(feature)
    }

    fn provider_id(&self) -> &'static str {
        "mapbox"
    }
}

// Mapbox API types

#[derive(Debug, Deserialize)]
struct MapboxResponse {
    features: Vec<MapboxFeature>,
}

#[derive(Debug, Deserialize)]
struct MapboxFeature {
    /// [longitude, latitude]
    center: [f64; 2],
    relevance: Option<f64>,
}
