//! Run-scoped memoization of geocode lookups.

use crate::provider::{AddressDetails, GeocodeResult};
use aeroscout_core::Coordinate;
use std::collections::HashMap;
use std::sync::RwLock;

/// Reverse-geocode cache keys round coordinates to a millionth of a degree,
/// roughly 10 cm, the same granularity the providers report.
#[allow(clippy::cast_possible_truncation)]
fn reverse_key(coordinate: Coordinate) -> (i64, i64) {
    (
        (coordinate.lat() * 1e6).round() as i64,
        (coordinate.lon() * 1e6).round() as i64,
    )
}

/// Normalize an address into its cache key form.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address.trim().to_string()
}

/// In-memory cache of geocode and reverse-geocode lookups.
///
/// Lifetime is the process run; there is no TTL or eviction. Reads and
/// writes are atomic per key. Shared across pipelines by `Arc`.
#[derive(Default)]
pub struct GeocodeCache {
    /// (provider, normalized address) -> result
    forward: RwLock<HashMap<(String, String), GeocodeResult>>,
    /// (provider, rounded coordinate) -> address fields
    reverse: RwLock<HashMap<(String, i64, i64), AddressDetails>>,
}

impl GeocodeCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached forward geocode result.
    #[must_use]
    pub fn get_forward(&self, provider: &str, address: &str) -> Option<GeocodeResult> {
        let cache = self.forward.read().expect("acquire read lock on forward cache");
        cache
            .get(&(provider.to_string(), normalize_address(address)))
            .cloned()
    }

    /// Store a forward geocode result.
    pub fn insert_forward(&self, provider: &str, address: &str, result: GeocodeResult) {
        let mut cache = self
            .forward
            .write()
            .expect("acquire write lock on forward cache");
        cache.insert((provider.to_string(), normalize_address(address)), result);
    }

    /// Look up a cached reverse geocode result.
    #[must_use]
    pub fn get_reverse(&self, provider: &str, coordinate: Coordinate) -> Option<AddressDetails> {
        let (lat, lon) = reverse_key(coordinate);
        let cache = self.reverse.read().expect("acquire read lock on reverse cache");
        cache.get(&(provider.to_string(), lat, lon)).cloned()
    }

    /// Store a reverse geocode result.
    pub fn insert_reverse(
        &self,
        provider: &str,
        coordinate: Coordinate,
        details: AddressDetails,
    ) {
        let (lat, lon) = reverse_key(coordinate);
        let mut cache = self
            .reverse
            .write()
            .expect("acquire write lock on reverse cache");
        cache.insert((provider.to_string(), lat, lon), details);
    }

    /// Number of cached forward results.
    #[must_use]
    pub fn forward_len(&self) -> usize {
        self.forward
            .read()
            .expect("acquire read lock on forward cache")
            .len()
    }

    /// Number of cached reverse results.
    #[must_use]
    pub fn reverse_len(&self) -> usize {
        self.reverse
            .read()
            .expect("acquire read lock on reverse cache")
            .len()
    }
}
