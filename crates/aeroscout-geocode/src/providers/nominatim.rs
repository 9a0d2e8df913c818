//! Nominatim (OpenStreetMap) geocoding provider.
//!
//! The only adapter that also implements reverse geocoding; the enrichment
//! pipeline routes through it. The public instance requires a descriptive
//! `User-Agent` and at most one request per second.

use crate::error::{GeocodeError, Result};
use crate::provider::{AddressDetails, GeocodeProvider, GeocodeResult};
use crate::providers::http_client;
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Confidence reported when Nominatim omits its importance score.
const DEFAULT_CONFIDENCE: f64 = 0.6;

/// Nominatim geocoding provider.
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimProvider {
    /// Create a new Nominatim provider.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        })
    }

    /// The public instance answers 429 or 503 when a client exceeds its
    /// request budget; everything else is an ordinary API error.
    async fn classify_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeocodeError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            return GeocodeError::RateLimited {
                provider: self.provider_id().to_string(),
                status: status.as_u16(),
            };
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        GeocodeError::ApiError {
            provider: self.provider_id().to_string(),
            status: status.as_u16(),
            message,
        }
    }

    /// Convert a Nominatim place into the uniform result shape.
    fn to_result(&self, place: &NominatimPlace) -> Result<GeocodeResult> {
        let lat = parse_coordinate_field(&place.lat)?;
        let lon = parse_coordinate_field(&place.lon)?;

        let coordinate = Coordinate::new(lat, lon).map_err(|e| GeocodeError::Parse {
            provider: self.provider_id().to_string(),
            message: e.to_string(),
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

fn parse_coordinate_field(value: &str) -> Result<f64> {
    value.parse().map_err(|_| GeocodeError::Parse {
        provider: "nominatim".to_string(),
        message: format!("non-numeric coordinate field: '{value}'"),
    })
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.classify_status(status, response).await);
        }

        let places: Vec<NominatimPlace> =
            response.json().await.map_err(|e| GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            })?;

        let place = places.first().ok_or_else(|| GeocodeError::EmptyResult {
            provider: self.provider_id().to_string(),
        })?;

        self.to_result(place)
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<AddressDetails> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinate.lat().to_string()),
                ("lon", coordinate.lon().to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.classify_status(status, response).await);
        }

        let body: NominatimReverse =
            response.json().await.map_err(|e| GeocodeError::Parse {
                provider: self.provider_id().to_string(),
                message: e.to_string(),
            })?;

        Ok(body.address.unwrap_or_default().into_details())
    }

    fn provider_id(&self) -> &'static str {
        "nominatim"
    }

    fn min_request_interval(&self) -> Duration {
        Duration::from_secs(1)
    }
}

// Nominatim API types

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    importance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    town: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// Map Nominatim's address keys onto the uniform fields; towns count as
    /// cities when no city is reported.
    fn into_details(self) -> AddressDetails {
        AddressDetails {
            street: self.road.unwrap_or_default(),
            postcode: self.postcode.unwrap_or_default(),
            city: self.city.or(self.town).unwrap_or_default(),
            country: self.country.unwrap_or_default(),
        }
    }
}
