//! Reverse-geocode enrichment of candidate suppliers.

use crate::model::CandidateSupplier;
use aeroscout_geocode::ReverseGeocoder;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Fills candidate address fields by reverse geocoding their coordinates.
///
/// Lookups run with bounded concurrency through an order-preserving buffered
/// stream, so output count and order always match the input. Individual
/// lookup failures degrade that candidate to empty address fields; they never
/// abort the run.
pub struct EnrichmentPipeline {
    geocoder: Arc<ReverseGeocoder>,
    max_concurrent: usize,
    progress_every: usize,
}

impl EnrichmentPipeline {
    /// Create a pipeline over the given reverse geocoder.
    #[must_use]
    pub fn new(geocoder: Arc<ReverseGeocoder>, max_concurrent: usize, progress_every: usize) -> Self {
        Self {
            geocoder,
            max_concurrent: max_concurrent.max(1),
            progress_every: progress_every.max(1),
        }
    }

    /// Enrich every candidate with reverse-geocoded address fields.
    ///
    /// When `enabled` is false this is the identity and makes no external
    /// calls.
    pub async fn enrich(
        &self,
        candidates: Vec<CandidateSupplier>,
        enabled: bool,
    ) -> Vec<CandidateSupplier> {
        if !enabled || candidates.is_empty() {
            return candidates;
        }

        let total = candidates.len();
        tracing::info!(total, "starting reverse-geocode enrichment");

        let mut enriched = Vec::with_capacity(total);
        let mut lookups = stream::iter(candidates.into_iter().map(|candidate| {
            let geocoder = self.geocoder.clone();
            async move {
                let lookup = geocoder.lookup(candidate.coordinate).await;
                (candidate, lookup)
            }
        }))
        .buffered(self.max_concurrent);

        let mut done = 0usize;
        while let Some((mut candidate, lookup)) = lookups.next().await {
            match lookup {
                Ok(details) => {
                    candidate.street = Some(details.street);
                    candidate.postcode = Some(details.postcode);
                    candidate.city = Some(details.city);
                    candidate.country = Some(details.country);
                }
                Err(e) => {
                    tracing::debug!(
                        name = %candidate.name,
                        error = %e,
                        "reverse geocode failed, leaving address empty"
                    );
                }
            }

            done += 1;
            if done % self.progress_every == 0 || done == total {
                tracing::info!(done, total, "enrichment progress");
            }
            enriched.push(candidate);
        }

        enriched
    }
}
