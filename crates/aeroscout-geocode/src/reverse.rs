//! Reverse geocoding with caching and pacing.

use crate::cache::GeocodeCache;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::provider::{AddressDetails, GeocodeProvider};
use aeroscout_core::Coordinate;
use std::sync::Arc;

/// Turns coordinates back into postal address fields.
///
/// Backed by a single provider; lookups are cached by rounded coordinate and
/// paced through the shared rate limiter so enrichment fan-out cannot hammer
/// the upstream service.
pub struct ReverseGeocoder {
    provider: Arc<dyn GeocodeProvider>,
    limiter: Arc<RateLimiter>,
    cache: Arc<GeocodeCache>,
}

impl ReverseGeocoder {
    /// Create a reverse geocoder backed by the given provider.
    #[must_use]
    pub fn new(
        provider: Arc<dyn GeocodeProvider>,
        limiter: Arc<RateLimiter>,
        cache: Arc<GeocodeCache>,
    ) -> Self {
        Self {
            provider,
            limiter,
            cache,
        }
    }

    /// Look up address details for a coordinate.
    ///
    /// # Errors
    /// Returns the provider's error on transport failure, a non-success
    /// status, or an unparsable body.
    pub async fn lookup(&self, coordinate: Coordinate) -> Result<AddressDetails> {
        let id = self.provider.provider_id();

        if let Some(hit) = self.cache.get_reverse(id, coordinate) {
            tracing::debug!(provider = id, %coordinate, "reverse cache hit");
            return Ok(hit);
        }

        self.limiter
            .acquire(id, self.provider.min_request_interval())
            .await;

        let details = self.provider.reverse(coordinate).await?;
        self.cache.insert_reverse(id, coordinate, details.clone());
        Ok(details)
    }
}
