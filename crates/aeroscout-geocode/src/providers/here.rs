//! HERE geocoding provider.

use crate::error::{GeocodeError, Result};
use crate::provider::{GeocodeProvider, GeocodeResult};
use crate::providers::http_client;
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://geocode.search.hereapi.com/v1/geocode";

/// Confidence reported when HERE omits the query score.
const DEFAULT_CONFIDENCE: f64 = 0.6;

/// HERE geocoding provider.
pub struct HereProvider {
    client: Client,
    key: String,
}

impl HereProvider {
    /// Create a new HERE provider with the given API key.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            key: key.into(),
        })
    }

    fn to_result(&self, item: &HereItem) -> Result<GeocodeResult> {
        let coordinate = Coordinate::new(item.position.lat, item.position.lng).map_err(|e| {
            GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(GeocodeResult {
            coordinate,
            provider: self.provider_id().to_string(),
            confidence: item
                .scoring
                .as_ref()
                .map_or(DEFAULT_CONFIDENCE, |s| s.query_score)
                .clamp(0.0, 1.0),
        })
    }
}

#[async_trait]
impl GeocodeProvider for HereProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .client
            .get(BASE_URL)
            .query(&[("q", address), ("apiKey", self.key.as_str())])
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

        let body: HereResponse = response.json().await.map_err(|e| GeocodeError::Parse {
            provider: self.provider_id().to_string(),
            message: e.to_string(),
        })?;

        let item = body
            .items
            .first()
            .ok_or_else(|| GeocodeError::EmptyResult {
                provider: self.provider_id().to_string(),
            })?;

        self.to_result(item)
    }

    fn provider_id(&self) -> &'static str {
        "here"
    }
}

// HERE API types

#[derive(Debug, Deserialize)]
struct HereResponse {
    #[serde(default)]
    items: Vec<HereItem>,
}

#[derive(Debug, Deserialize)]
struct HereItem {
    position: HerePosition,
    scoring: Option<HereScoring>,
}

#[derive(Debug, Deserialize)]
struct HerePosition {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct HereScoring {
    #[serde(rename = "queryScore")]
    query_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> HereProvider {
        HereProvider::new("test-key", Duration::from_secs(10)).expect("create provider")
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "items": [{
                "position": {"lat": 51.5088, "lng": -2.5782},
                "scoring": {"queryScore": 0.99}
            }]
        }"#;
        let parsed: HereResponse = serde_json::from_str(body).expect("parse body");

        let result = provider().to_result(&parsed.items[0]).expect("convert");
        assert!((result.coordinate.lat() - 51.5088).abs() < 1e-9);
        assert!((result.confidence - 0.99).abs() < 1e-9);
        assert_eq!(result.provider, "here");
    }

    #[test]
    fn test_missing_scoring_uses_default() {
        let body = r#"{"items": [{"position": {"lat": 51.5088, "lng": -2.5782}}]}"#;
        let parsed: HereResponse = serde_json::from_str(body).expect("parse body");

        let result = provider().to_result(&parsed.items[0]).expect("convert");
        assert!((result.confidence - DEFAULT_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_empty_items_parses() {
        let parsed: HereResponse = serde_json::from_str("{}").expect("parse body");
        assert!(parsed.items.is_empty());
    }
}
