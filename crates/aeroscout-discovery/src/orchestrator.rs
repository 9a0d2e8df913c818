//! End-to-end supplier discovery pipeline.

use crate::dedup::Deduplicator;
use crate::enrich::EnrichmentPipeline;
use crate::error::Result;
use crate::filter::TaxonomyFilter;
use crate::model::{CandidateSupplier, DiscoveryOptions};
use crate::overpass::SpatialDiscovery;
use aeroscout_core::Coordinate;
use std::sync::Arc;

/// Composes discovery, classification, deduplication, and enrichment into
/// the single entry point callers consume.
///
/// Stage order is fixed: discover, classify, deduplicate, enrich, sort.
/// Deduplication runs before enrichment so collapsed duplicates never cost a
/// reverse-geocode lookup.
pub struct DiscoveryOrchestrator {
    source: Arc<dyn SpatialDiscovery>,
    filter: TaxonomyFilter,
    deduplicator: Deduplicator,
    enrichment: EnrichmentPipeline,
}

impl DiscoveryOrchestrator {
    /// Assemble the pipeline from its stages.
    #[must_use]
    pub fn new(
        source: Arc<dyn SpatialDiscovery>,
        filter: TaxonomyFilter,
        deduplicator: Deduplicator,
        enrichment: EnrichmentPipeline,
    ) -> Self {
        Self {
            source,
            filter,
            deduplicator,
            enrichment,
        }
    }

    /// Find candidate suppliers within `radius_miles` of `origin`.
    ///
    /// Returns candidates sorted ascending by distance from the origin.
    ///
    /// # Errors
    /// Discovery and configuration failures are fatal and propagate with
    /// their source detail; per-candidate enrichment failures do not.
    pub async fn find_suppliers(
        &self,
        origin: Coordinate,
        radius_miles: f64,
        options: DiscoveryOptions,
    ) -> Result<Vec<CandidateSupplier>> {
        tracing::info!(
            %origin,
            radius_miles,
            deduplicate = options.deduplicate,
            reverse_geocode = options.reverse_geocode,
            "starting supplier discovery"
        );

        let records = self.source.discover(origin, radius_miles).await?;
        let mut candidates = self.filter.classify_all(&records, origin);
        tracing::info!(
            raw = records.len(),
            classified = candidates.len(),
            "classification complete"
        );

        if options.deduplicate {
            candidates = self.deduplicator.deduplicate(candidates);
        }

        candidates = self
            .enrichment
            .enrich(candidates, options.reverse_geocode)
            .await;

        candidates.sort_by(|a, b| {
            a.distance_miles
                .partial_cmp(&b.distance_miles)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::info!(candidates = candidates.len(), "supplier discovery complete");
        Ok(candidates)
    }
}
