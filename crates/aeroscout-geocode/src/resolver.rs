//! Ordered-failover address resolution.

use crate::cache::{normalize_address, GeocodeCache};
use crate::error::{GeocodeError, Result};
use crate::limiter::RateLimiter;
use crate::provider::{GeocodeProvider, GeocodeResult};
use std::sync::Arc;

/// Default minimum confidence for a result to be accepted.
const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Resolves a free-text address through an ordered chain of providers.
///
/// Providers are tried in the configured priority order; the first result at
/// or above the confidence threshold wins and later providers are never
/// consulted, a deliberate latency-over-precision choice. The resolver never
/// aggregates across providers.
pub struct GeocodeResolver {
    providers: Vec<Arc<dyn GeocodeProvider>>,
    limiter: Arc<RateLimiter>,
    cache: Arc<GeocodeCache>,
    min_confidence: f64,
}

impl GeocodeResolver {
    /// Create a resolver with no providers registered.
    #[must_use]
    pub fn new(limiter: Arc<RateLimiter>, cache: Arc<GeocodeCache>) -> Self {
        Self {
            providers: Vec::new(),
            limiter,
            cache,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Set the minimum confidence threshold.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Append a provider to the failover order.
    pub fn add_provider(&mut self, provider: Arc<dyn GeocodeProvider>) {
        self.providers.push(provider);
    }

    /// Append every provider in the given order.
    pub fn add_providers(&mut self, providers: impl IntoIterator<Item = Arc<dyn GeocodeProvider>>) {
        self.providers.extend(providers);
    }

    /// Registered providers, in failover order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn GeocodeProvider>] {
        &self.providers
    }

    /// Resolve an address into a coordinate.
    ///
    /// # Errors
    /// Returns [`GeocodeError::EmptyAddress`] for a blank address and
    /// [`GeocodeError::Exhausted`] when every provider fails, returns no
    /// match, or stays under the confidence threshold.
    pub async fn resolve(&self, address: &str) -> Result<GeocodeResult> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let mut last_error = GeocodeError::Internal("no providers configured".to_string());

        for provider in &self.providers {
            let id = provider.provider_id();

            if let Some(hit) = self.cache.get_forward(id, &key) {
                tracing::debug!(provider = id, address = %key, "geocode cache hit");
                return Ok(hit);
            }

            self.limiter
                .acquire(id, provider.min_request_interval())
                .await;

            match provider.geocode(&key).await {
                Ok(result) if result.confidence >= self.min_confidence => {
                    tracing::info!(
                        provider = id,
                        address = %key,
                        confidence = result.confidence,
                        "geocode resolved"
                    );
                    self.cache.insert_forward(id, &key, result.clone());
                    return Ok(result);
                }
                Ok(result) => {
                    tracing::warn!(
                        provider = id,
                        confidence = result.confidence,
                        threshold = self.min_confidence,
                        "geocode result under-confident, trying next provider"
                    );
                    last_error = GeocodeError::LowConfidence {
                        provider: id.to_string(),
                        confidence: result.confidence,
                        threshold: self.min_confidence,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        provider = id,
                        error = %e,
                        "geocode provider failed, trying next provider"
                    );
                    last_error = e;
                }
            }
        }

        Err(GeocodeError::Exhausted {
            address: key,
            last_error: last_error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GeocodeProvider;
    use aeroscout_core::Coordinate;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock provider returning a fixed outcome, counting calls.
    struct MockProvider {
        id: &'static str,
        outcome: Option<(f64, f64, f64)>, // (lat, lon, confidence)
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn succeeding(id: &'static str, lat: f64, lon: f64, confidence: f64) -> Arc<Self> {
            Arc::new(Self {
                id,
                outcome: Some((lat, lon, confidence)),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                outcome: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for MockProvider {
        async fn geocode(&self, _address: &str) -> Result<GeocodeResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Some((lat, lon, confidence)) => Ok(GeocodeResult {
                    coordinate: Coordinate::new(lat, lon).expect("valid mock coordinate"),
                    provider: self.id.to_string(),
                    confidence,
                }),
                None => Err(GeocodeError::EmptyResult {
                    provider: self.id.to_string(),
                }),
            }
        }

        fn provider_id(&self) -> &'static str {
            self.id
        }
    }

    fn resolver() -> GeocodeResolver {
        GeocodeResolver::new(Arc::new(RateLimiter::new()), Arc::new(GeocodeCache::new()))
    }

    #[tokio::test]
    async fn test_first_confident_result_wins() {
        // The second provider would score higher, but must never be asked.
        let first = MockProvider::succeeding("first", 51.5088, -2.5782, 0.6);
        let second = MockProvider::succeeding("second", 48.8566, 2.3522, 0.99);

        let mut resolver = resolver();
        resolver.add_provider(first.clone());
        resolver.add_provider(second.clone());

        let result = resolver
            .resolve("Filton, Bristol, UK")
            .await
            .expect("resolve address");

        assert_eq!(result.provider, "first");
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_provider_advances_to_next() {
        let broken = MockProvider::failing("broken");
        let backup = MockProvider::succeeding("backup", 51.5088, -2.5782, 0.8);

        let mut resolver = resolver();
        resolver.add_provider(broken.clone());
        resolver.add_provider(backup.clone());

        let result = resolver
            .resolve("Filton, Bristol, UK")
            .await
            .expect("resolve address");

        assert_eq!(result.provider, "backup");
        assert_eq!(broken.call_count(), 1);
    }

    #[tokio::test]
    async fn test_under_confident_result_advances() {
        let vague = MockProvider::succeeding("vague", 51.0, -2.0, 0.1);
        let sharp = MockProvider::succeeding("sharp", 51.5088, -2.5782, 0.9);

        let mut resolver = resolver();
        resolver.add_provider(vague);
        resolver.add_provider(sharp);

        let result = resolver
            .resolve("Filton, Bristol, UK")
            .await
            .expect("resolve address");

        assert_eq!(result.provider, "sharp");
    }

    #[tokio::test]
    async fn test_all_failing_is_exhausted() {
        let mut resolver = resolver();
        resolver.add_provider(MockProvider::failing("a"));
        resolver.add_provider(MockProvider::failing("b"));

        let result = resolver.resolve("Filton, Bristol, UK").await;
        match result {
            Err(GeocodeError::Exhausted {
                address,
                last_error,
            }) => {
                assert_eq!(address, "Filton, Bristol, UK");
                assert!(last_error.contains("b"));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_providers_is_exhausted() {
        let result = resolver().resolve("Filton, Bristol, UK").await;
        assert!(matches!(result, Err(GeocodeError::Exhausted { .. })));
    }

    #[tokio::test]
    async fn test_empty_address_rejected() {
        let mut resolver = resolver();
        resolver.add_provider(MockProvider::succeeding("p", 0.0, 0.0, 0.9));

        let result = resolver.resolve("   ").await;
        assert!(matches!(result, Err(GeocodeError::EmptyAddress)));
    }

    #[tokio::test]
    async fn test_cache_prevents_second_provider_call() {
        let provider = MockProvider::succeeding("cached", 51.5088, -2.5782, 0.8);

        let mut resolver = resolver();
        resolver.add_provider(provider.clone());

        let first = resolver
            .resolve("Filton, Bristol, UK")
            .await
            .expect("first resolution");
        // Same address with extra whitespace normalizes to the same key.
        let second = resolver
            .resolve("  Filton, Bristol, UK ")
            .await
            .expect("second resolution");

        assert_eq!(first, second);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let exact = MockProvider::succeeding("exact", 51.5088, -2.5782, 0.3);

        let mut resolver = resolver();
        resolver.add_provider(exact);

        let result = resolver
            .resolve("Filton, Bristol, UK")
            .await
            .expect("resolve at exact threshold");
        assert_eq!(result.provider, "exact");
    }
}
