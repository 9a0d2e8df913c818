//! Core geocoding provider trait and result types.

use crate::error::{GeocodeError, Result};
use aeroscout_core::Coordinate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trait for external geocoding services.
///
/// Each adapter translates one provider's native request/response shapes into
/// the uniform contract below. Implementations must be thread-safe
/// (Send + Sync) so they can be shared across concurrent pipelines.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Resolve a free-text address into a coordinate.
    ///
    /// Providers return their own single best match; ambiguous addresses are
    /// not disambiguated here.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, an empty
    /// match list, or an unparsable body.
    async fn geocode(&self, address: &str) -> Result<GeocodeResult>;

    /// Reverse-geocode a coordinate into structured address fields.
    ///
    /// # Errors
    /// Returns [`GeocodeError::ReverseUnsupported`] unless the provider
    /// implements reverse lookups.
    async fn reverse(&self, coordinate: Coordinate) -> Result<AddressDetails> {
        let _ = coordinate;
        Err(GeocodeError::ReverseUnsupported {
            provider: self.provider_id().to_string(),
        })
    }

    /// Get the unique identifier for this provider.
    fn provider_id(&self) -> &'static str;

    /// Minimum spacing between requests this provider tolerates.
    ///
    /// Zero means the provider imposes no per-request pacing beyond its
    /// normal quota handling.
    fn min_request_interval(&self) -> Duration {
        Duration::ZERO
    }
}

/// A successful geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Resolved coordinate
    pub coordinate: Coordinate,

    /// Identifier of the provider that produced the result
    pub provider: String,

    /// Provider-derived confidence in [0, 1]
    pub confidence: f64,
}

/// Structured postal address fields from a reverse-geocode lookup.
///
/// Fields the provider did not report are left as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    /// Street or road name
    pub street: String,
    /// Postal code
    pub postcode: String,
    /// City or town
    pub city: String,
    /// Country name
    pub country: String,
}

impl AddressDetails {
    /// Whether every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.postcode.is_empty()
            && self.city.is_empty()
            && self.country.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_details_is_empty() {
        assert!(AddressDetails::default().is_empty());

        let details = AddressDetails {
            street: "Golf Course Lane".to_string(),
            ..AddressDetails::default()
        };
        assert!(!details.is_empty());
    }

    #[test]
    fn test_geocode_result_serde_roundtrip() {
        let result = GeocodeResult {
            coordinate: Coordinate::new(51.5088, -2.5782).expect("valid coordinate"),
            provider: "nominatim".to_string(),
            confidence: 0.8,
        };

        let json = serde_json::to_string(&result).expect("serialize result");
        let parsed: GeocodeResult = serde_json::from_str(&json).expect("deserialize result");
        assert_eq!(parsed, result);
    }

    #[tokio::test]
    async fn test_reverse_default_is_unsupported() {
        struct Stub;

        #[async_trait]
        impl GeocodeProvider for Stub {
            async fn geocode(&self, _address: &str) -> Result<GeocodeResult> {
                unreachable!()
            }

            fn provider_id(&self) -> &'static str {
                "stub"
            }
        }

        let coord = Coordinate::new(0.0, 0.0).expect("valid coordinate");
        let result = Stub.reverse(coord).await;
        assert!(matches!(
            result,
            Err(GeocodeError::ReverseUnsupported { .. })
        ));
    }
}
